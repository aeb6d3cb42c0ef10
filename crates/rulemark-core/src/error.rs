use std::fmt;

/// Error kinds for categorizing parse failures.
///
/// The grammar is total for the built-in rule set, so under normal
/// operation no error is ever surfaced: malformed definitions fall back to
/// paragraph text and unresolved references degrade to literal text nodes.
/// The one remaining kind exists for custom rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No rule matched the current position. Impossible with the built-in
    /// rules (the text rule is a catch-all); with a user-supplied rule set
    /// it indicates the set has a gap.
    RuleExhaustion,
}

/// A parse error from the rule engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Error categorization.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Create an error for a position no rule could consume.
    pub(crate) fn rule_exhaustion(remaining: &str) -> Self {
        let preview: String = remaining.chars().take(24).collect();
        Self {
            message: format!("no rule matched at {preview:?}"),
            kind: ParseErrorKind::RuleExhaustion,
        }
    }

    /// Create an error for a capture that cannot advance the engine.
    pub(crate) fn bad_capture(rule: &str) -> Self {
        Self {
            message: format!("rule {rule} produced a capture outside the input"),
            kind: ParseErrorKind::RuleExhaustion,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
