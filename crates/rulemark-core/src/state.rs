//! Per-parse state threaded through the rule engine.
//!
//! A [`State`] is created for every top-level parse and carries the active
//! [`Mode`] plus the document's reference-definition table. Nothing here is
//! process-global: concurrent parses of different inputs never share state.

use std::collections::HashMap;

/// Which rule set is active at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Top-of-document parsing: block rules plus the text/br fallbacks.
    Block,
    /// Prose parsing inside paragraphs and block bodies.
    Inline,
    /// Restricted inline parsing for contexts that must not re-enter block
    /// parsing or hard breaks: link display text, heading bodies, table
    /// cells.
    SimpleInline,
}

/// A collected link-reference definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefDef {
    pub target: String,
    pub title: Option<String>,
}

/// Document-scoped table mapping normalized labels to definitions.
///
/// Duplicate definitions overwrite earlier entries; reference links are
/// resolved against the final state of the table, so a later definition
/// retroactively wins for the whole document.
#[derive(Debug, Clone, Default)]
pub struct RefTable {
    defs: HashMap<String, RefDef>,
}

impl RefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under the normalized form of `label`.
    pub fn insert(&mut self, label: &str, target: String, title: Option<String>) {
        self.defs
            .insert(normalize_label(label), RefDef { target, title });
    }

    /// Look up a definition by raw label.
    pub fn get(&self, label: &str) -> Option<&RefDef> {
        self.defs.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Normalize a reference label: ASCII-lowercase it and collapse every
/// whitespace run to a single space. `" h    i "` becomes `" h i "`.
/// Idempotent.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_ws = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c.to_ascii_lowercase());
            in_ws = false;
        }
    }
    out
}

/// Mutable state for a single engine run.
#[derive(Debug, Clone)]
pub struct State {
    /// Active parse mode; rules are filtered against it.
    pub mode: Mode,
    /// Reference-definition table for the document being parsed.
    pub refs: RefTable,
    /// Set while parsing list item bodies so nested lists can match in
    /// inline mode.
    pub(crate) in_list: bool,
}

impl State {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            refs: RefTable::new(),
            in_list: false,
        }
    }
}
