//! The built-in rule set.
//!
//! Rules are declared here in priority order; [`builtin_rules`] is the
//! fixed registry the default [`crate::Parser`] is built from. Block rules
//! run before inline rules, and within each group the order encodes the
//! grammar's ambiguity resolution (a setext underline beats a horizontal
//! rule, a table beats a paragraph, and so on).

pub mod block;
pub mod inline;

use crate::rule::Rule;

/// Dispatch priorities for the built-in rules, ascending.
pub mod order {
    pub const HEADING: u16 = 10;
    pub const LHEADING: u16 = 20;
    pub const HR: u16 = 30;
    pub const CODE_BLOCK: u16 = 40;
    pub const FENCE: u16 = 50;
    pub const BLOCK_QUOTE: u16 = 60;
    pub const LIST: u16 = 70;
    pub const DEF: u16 = 80;
    pub const TABLE: u16 = 90;
    pub const NEWLINE: u16 = 100;
    pub const PARAGRAPH: u16 = 110;
    pub const ESCAPE: u16 = 120;
    pub const AUTOLINK: u16 = 130;
    pub const MAILTO: u16 = 140;
    pub const URL: u16 = 150;
    pub const LINK: u16 = 160;
    pub const IMAGE: u16 = 170;
    pub const REFLINK: u16 = 180;
    pub const REFIMAGE: u16 = 190;
    pub const EM: u16 = 200;
    pub const STRONG: u16 = 210;
    pub const U: u16 = 220;
    pub const DEL: u16 = 230;
    pub const INLINE_CODE: u16 = 240;
    pub const BR: u16 = 250;
    pub const TEXT: u16 = 260;
}

/// The complete built-in rule set, in declaration order.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(block::Heading),
        Box::new(block::LHeading),
        Box::new(block::Hr),
        Box::new(block::CodeBlock),
        Box::new(block::Fence),
        Box::new(block::BlockQuote),
        Box::new(block::List),
        Box::new(block::Def),
        Box::new(block::Table),
        Box::new(block::Newline),
        Box::new(block::Paragraph),
        Box::new(inline::Escape),
        Box::new(inline::AutoLink),
        Box::new(inline::Mailto),
        Box::new(inline::Url),
        Box::new(inline::Link),
        Box::new(inline::Image),
        Box::new(inline::RefLink),
        Box::new(inline::RefImage),
        Box::new(inline::Em),
        Box::new(inline::Strong),
        Box::new(inline::U),
        Box::new(inline::Del),
        Box::new(inline::InlineCode),
        Box::new(inline::Br),
        Box::new(inline::Text),
    ]
}
