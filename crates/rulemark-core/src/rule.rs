//! The rule abstraction: a prioritized matcher plus transformer.
//!
//! A [`Rule`] pairs an anchored prefix matcher with a transformer that
//! turns the resulting [`Capture`] into nodes, possibly recursing into the
//! engine for nested content. The built-in set lives in [`crate::rules`];
//! consumers can implement this trait to build alternative rule sets via
//! [`crate::Parser::with_rules`].

use crate::ast::Node;
use crate::engine::Parser;
use crate::error::ParseError;
use crate::state::{Mode, State};

/// The successful match of a rule at the current position.
///
/// Holds the whole matched prefix plus rule-specific captured substrings
/// (1-based, like regex groups; `None` where an optional part did not
/// participate).
#[derive(Debug, Clone)]
pub struct Capture {
    whole: String,
    groups: Vec<Option<String>>,
}

impl Capture {
    /// Build a capture from the whole matched prefix and its groups.
    pub fn new(whole: impl Into<String>, groups: Vec<Option<String>>) -> Self {
        Self {
            whole: whole.into(),
            groups,
        }
    }

    /// Capture with no extra groups.
    pub fn span(whole: impl Into<String>) -> Self {
        Self::new(whole, Vec::new())
    }

    /// The whole matched prefix.
    #[inline]
    pub fn whole(&self) -> &str {
        &self.whole
    }

    /// Number of input bytes this capture consumes.
    #[inline]
    pub fn len(&self) -> usize {
        self.whole.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.whole.is_empty()
    }

    /// Captured group `n` (1-based), if it participated.
    #[inline]
    pub fn group(&self, n: usize) -> Option<&str> {
        debug_assert!(n >= 1, "group 0 is the whole match; use whole()");
        self.groups.get(n - 1).and_then(|g| g.as_deref())
    }

    /// Captured group `n`, defaulting to the empty string.
    #[inline]
    pub fn group_or_empty(&self, n: usize) -> &str {
        self.group(n).unwrap_or("")
    }

    /// Captured group `n` as an owned `Option<String>`.
    #[inline]
    pub fn group_owned(&self, n: usize) -> Option<String> {
        self.group(n).map(str::to_owned)
    }
}

/// What a rule's transformer produced.
#[derive(Debug, Clone)]
pub enum Output {
    /// A single node.
    Node(Node),
    /// Zero or more nodes, appended in order. Separator rules return an
    /// empty vector.
    Nodes(Vec<Node>),
}

impl From<Node> for Output {
    fn from(node: Node) -> Self {
        Output::Node(node)
    }
}

/// Set of parse modes a rule participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSet(u8);

impl ModeSet {
    pub const BLOCK: ModeSet = ModeSet(0b001);
    pub const INLINE: ModeSet = ModeSet(0b010);
    pub const SIMPLE: ModeSet = ModeSet(0b100);
    /// Inline and simple-inline: the usual span rules.
    pub const ANY_INLINE: ModeSet = ModeSet(0b110);
    /// Block and inline, but not simple-inline: the `br` rule.
    pub const BLOCK_AND_INLINE: ModeSet = ModeSet(0b011);
    /// Every mode: the text fallback.
    pub const ALL: ModeSet = ModeSet(0b111);

    #[inline]
    pub fn contains(self, mode: Mode) -> bool {
        let bit = match mode {
            Mode::Block => 0b001,
            Mode::Inline => 0b010,
            Mode::SimpleInline => 0b100,
        };
        self.0 & bit != 0
    }
}

/// A named, ordered matcher/transformer pair.
///
/// The engine iterates rules by ascending [`order`](Rule::order)
/// (declaration order breaking ties), calls
/// [`try_match`](Rule::try_match) on those whose [`modes`](Rule::modes)
/// contain the active mode, and hands the winning capture to
/// [`parse`](Rule::parse).
pub trait Rule: Send + Sync {
    /// Stable rule name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Dispatch priority; smaller runs first.
    fn order(&self) -> u16;

    /// Modes in which this rule is eligible.
    fn modes(&self) -> ModeSet;

    /// Attempt an anchored match at the start of `src`.
    ///
    /// `prev` is the raw text of the previous successful capture in the
    /// current run (`None` at the start); rules that only apply at a line
    /// start after a blank line consult it.
    fn try_match(&self, src: &str, state: &State, prev: Option<&str>) -> Option<Capture>;

    /// Optional tiebreaker. When the best match so far carries a quality,
    /// the engine keeps scanning and picks the highest-quality match;
    /// quality-less competitors count as 0.
    fn quality(&self, capture: &Capture) -> Option<f64> {
        let _ = capture;
        None
    }

    /// Turn a capture into node(s), recursing through `parser` for nested
    /// content.
    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError>;
}
