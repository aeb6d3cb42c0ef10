//! # rulemark-core
//!
//! A rule-driven, recursive-descent parser for Markdown-style lightweight
//! markup. An ordered set of block and inline rules is dispatched over the
//! source string, producing a tree of typed [`Node`]s ready for a
//! downstream renderer; this crate deliberately stops at the tree (no
//! HTML output, no URL sanitation).
//!
//! ## Quick start
//!
//! ```rust
//! use rulemark_core::{parse, Node};
//!
//! let nodes = parse("**hi**").unwrap();
//! assert!(matches!(nodes[0], Node::Strong { .. }));
//! ```
//!
//! Input that ends with a blank line parses as a block document;
//! anything else parses as a bare inline sequence:
//!
//! ```rust
//! use rulemark_core::{parse, Node};
//!
//! let doc = parse("# Title\n\nBody text.\n\n").unwrap();
//! assert!(matches!(doc[0], Node::Heading { level: 1, .. }));
//! assert!(matches!(doc[1], Node::Paragraph { .. }));
//! ```
//!
//! ## Custom rule sets
//!
//! The engine is a plain dispatcher over [`Rule`] implementations;
//! [`Parser::with_rules`] builds a parse function bound to an alternative
//! ordered rule set.

pub mod ast;
pub mod engine;
pub mod error;
pub mod rule;
pub mod rules;
mod scan;
pub mod state;

pub use ast::{Alignment, Node};
pub use engine::Parser;
pub use error::{ParseError, ParseErrorKind};
pub use rule::{Capture, ModeSet, Output, Rule};
pub use state::{normalize_label, Mode, RefDef, RefTable, State};

/// Parse with the built-in rules, inferring block or inline mode from the
/// input (a trailing blank line selects block mode).
pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    Parser::new().parse(source)
}

/// Parse a block-mode document with the built-in rules.
pub fn parse_block(source: &str) -> Result<Vec<Node>, ParseError> {
    Parser::new().parse_block(source)
}

/// Parse an inline sequence with the built-in rules.
pub fn parse_inline(source: &str) -> Result<Vec<Node>, ParseError> {
    Parser::new().parse_inline(source)
}
