//! Node types produced by the parser.
//!
//! The tree is a pure value: nodes own their strings, children are ordered
//! `Vec<Node>` sequences, and there are no back-pointers. Optional fields
//! (`title`, `lang`, `start`) are always present on their variant and carry
//! `None` when absent, so consumers can distinguish "no title" from an empty
//! one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Column alignment of a table, taken from the alignment row.
///
/// A column without alignment markers is represented as `None` in the
/// table's `align` vector, so the vector always has one entry per header
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    /// `:-` / `:--`
    Left,
    /// `-:` / `--:`
    Right,
    /// `:-:` / `:---:`
    Center,
}

/// A parsed node.
///
/// The tag set is closed: every node the engine produces is one of these
/// variants. Block-level variants (`Paragraph` through `Def`) appear at the
/// top level of a block-mode parse; inline variants appear inside prose
/// containers and at the top level of an inline-mode parse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum Node {
    /// Plain text run.
    Text { content: String },
    /// `**strong**` emphasis.
    Strong { content: Vec<Node> },
    /// `*em*` / `_em_` emphasis.
    Em { content: Vec<Node> },
    /// `__underlined__` span.
    U { content: Vec<Node> },
    /// `~~deleted~~` span.
    Del { content: Vec<Node> },
    /// Backtick-delimited literal span; inner markup is inert.
    InlineCode { content: String },
    /// Hard line break from two trailing spaces.
    Br,
    /// Hyperlink. `target` may be empty (`<>` autolink) but never absent.
    Link {
        content: Vec<Node>,
        target: String,
        title: Option<String>,
    },
    /// Image. `alt` is the raw bracketed text, not a parsed tree.
    Image {
        alt: String,
        target: String,
        title: Option<String>,
    },
    /// Paragraph of inline content.
    Paragraph { content: Vec<Node> },
    /// ATX or setext heading, level 1-6.
    Heading { level: u8, content: Vec<Node> },
    /// Fenced or indented code block. Indented blocks have `lang: None`.
    CodeBlock {
        lang: Option<String>,
        content: String,
    },
    /// `>`-prefixed quotation; body is re-parsed in block mode.
    BlockQuote { content: Vec<Node> },
    /// Ordered or unordered list. Each item is an independent sub-tree:
    /// a flat inline sequence for tight items, block nodes for loose ones.
    List {
        ordered: bool,
        start: Option<u32>,
        items: Vec<Vec<Node>>,
    },
    /// Pipe table. `align.len()` equals the header column count.
    Table {
        header: Vec<Vec<Node>>,
        align: Vec<Option<Alignment>>,
        cells: Vec<Vec<Vec<Node>>>,
    },
    /// Horizontal rule.
    Hr,
    /// Link-reference definition. `def` is the normalized label.
    Def {
        def: String,
        target: String,
        title: Option<String>,
    },
}

impl Node {
    /// Convenience constructor for the most common node.
    #[inline]
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    /// Whether this node is a block-level construct.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Node::Paragraph { .. }
                | Node::Heading { .. }
                | Node::CodeBlock { .. }
                | Node::BlockQuote { .. }
                | Node::List { .. }
                | Node::Table { .. }
                | Node::Hr
                | Node::Def { .. }
        )
    }
}
