//! The recursive rule-dispatch engine.
//!
//! [`Parser`] owns an ordered rule set and repeatedly consumes the first
//! matching rule's capture until the input is empty. Rules recurse back
//! into the engine through [`Parser::recurse`] to parse nested content
//! under an overridden mode.
//!
//! Block-mode parses are two-pass: reference definitions are collected
//! from the whole source before any node is built, so reference links
//! always resolve against the final state of the table — a later
//! definition retroactively wins for the entire document.

use crate::ast::Node;
use crate::error::ParseError;
use crate::rule::{Capture, Output, Rule};
use crate::rules;
use crate::scan;
use crate::state::{Mode, State};

/// A parse function bound to an ordered rule set.
pub struct Parser {
    rules: Vec<Box<dyn Rule>>,
}

impl Parser {
    /// Parser over the built-in rule set.
    pub fn new() -> Self {
        Self::with_rules(rules::builtin_rules())
    }

    /// Parser over a caller-supplied rule set. Rules are dispatched by
    /// ascending `order`; the sort is stable, so declaration order breaks
    /// ties.
    pub fn with_rules(mut rules: Vec<Box<dyn Rule>>) -> Self {
        rules.sort_by_key(|r| r.order());
        Self { rules }
    }

    /// Parse with the mode inferred from the source: input terminated by a
    /// blank line parses as blocks, anything else as a bare inline
    /// sequence. This is why a one-line document yields a `Text` node
    /// rather than a `Paragraph`.
    pub fn parse(&self, source: &str) -> Result<Vec<Node>, ParseError> {
        let mode = if scan::ends_with_blank_line(source) {
            Mode::Block
        } else {
            Mode::Inline
        };
        self.parse_with_mode(source, mode)
    }

    /// Parse in block mode unconditionally.
    pub fn parse_block(&self, source: &str) -> Result<Vec<Node>, ParseError> {
        self.parse_with_mode(source, Mode::Block)
    }

    /// Parse in inline mode unconditionally.
    pub fn parse_inline(&self, source: &str) -> Result<Vec<Node>, ParseError> {
        self.parse_with_mode(source, Mode::Inline)
    }

    fn parse_with_mode(&self, source: &str, mode: Mode) -> Result<Vec<Node>, ParseError> {
        let mut state = State::new(mode);
        if mode == Mode::Block {
            rules::block::collect_defs(source, &mut state.refs);
        }
        self.run(source, &mut state)
    }

    /// The dispatch loop: consume the winning rule's capture, append its
    /// nodes, advance, repeat until the source is exhausted.
    pub(crate) fn run(&self, source: &str, state: &mut State) -> Result<Vec<Node>, ParseError> {
        let mut out = Vec::new();
        let mut pos = 0;
        let mut prev: Option<&str> = None;

        while pos < source.len() {
            let rest = &source[pos..];
            let (rule, capture) = self.select(rest, state, prev)?;
            if capture.is_empty() || capture.len() > rest.len() {
                return Err(ParseError::bad_capture(rule.name()));
            }
            match rule.parse(&capture, self, state)? {
                Output::Node(node) => out.push(node),
                Output::Nodes(nodes) => out.extend(nodes),
            }
            prev = Some(&source[pos..pos + capture.len()]);
            pos += capture.len();
        }

        Ok(out)
    }

    /// Re-enter the engine on nested content under `mode`, restoring the
    /// previous mode afterwards. This is the recursion hook rule
    /// transformers use to parse quote bodies, list items, link text, and
    /// emphasis bodies.
    pub fn recurse(
        &self,
        inner: &str,
        state: &mut State,
        mode: Mode,
    ) -> Result<Vec<Node>, ParseError> {
        let saved = state.mode;
        state.mode = mode;
        let result = self.run(inner, state);
        state.mode = saved;
        result
    }

    /// Pick the rule to apply at the current position.
    ///
    /// Rules are scanned in priority order. The first quality-less match
    /// wins outright; a match that reports a quality keeps the scan open,
    /// competing matches are compared by quality (quality-less ones count
    /// as zero), and the best wins.
    fn select<'a>(
        &'a self,
        rest: &str,
        state: &State,
        prev: Option<&str>,
    ) -> Result<(&'a dyn Rule, Capture), ParseError> {
        let mut best: Option<(&dyn Rule, Capture, f64)> = None;

        for rule in &self.rules {
            if !rule.modes().contains(state.mode) {
                continue;
            }
            let Some(capture) = rule.try_match(rest, state, prev) else {
                continue;
            };
            match rule.quality(&capture) {
                None => match &best {
                    None => return Ok((rule.as_ref(), capture)),
                    Some((_, _, best_q)) if *best_q < 0.0 => {
                        best = Some((rule.as_ref(), capture, 0.0));
                    }
                    Some(_) => {}
                },
                Some(q) => {
                    if best.as_ref().map_or(true, |(_, _, best_q)| q > *best_q) {
                        best = Some((rule.as_ref(), capture, q));
                    }
                }
            }
        }

        match best {
            Some((rule, capture, _)) => Ok((rule, capture)),
            None => Err(ParseError::rule_exhaustion(rest)),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
