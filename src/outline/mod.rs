//! Symbol outline extraction
//!
//! Provides structural symbol extraction from tree-sitter parse trees.
//! Used by the outline collaborator to show a flat list of named
//! definitions with their declaration line. Extraction is advisory: it
//! must never block or fail editing, so malformed source yields an empty
//! outline instead of an error.

mod extract;

pub use extract::extract;

/// Symbol kind for display and categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Class,
}

impl SymbolKind {
    /// Short label for rendering in the outline list
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Function => "fn",
            SymbolKind::Class => "class",
        }
    }
}

/// A single named definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    /// Declaration line (0-based)
    pub line_index: usize,
}

/// Complete outline for a document, in source order per sequence
#[derive(Debug, Clone, Default)]
pub struct SymbolOutline {
    /// Document revision this was extracted against
    pub revision: u64,
    pub functions: Vec<SymbolEntry>,
    pub classes: Vec<SymbolEntry>,
}

impl SymbolOutline {
    /// Create an empty outline
    pub fn empty(revision: u64) -> Self {
        Self {
            revision,
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Check if the outline has any symbols
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }
}
