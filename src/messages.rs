//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Background workers
//! never touch the model directly: they send a message back through the
//! session channel and the update layer decides whether the result is
//! still current.

use crate::complete::CompletionCandidate;
use crate::lint::LintFinding;
use crate::model::MarkerKind;
use crate::outline::SymbolOutline;

/// Document messages (text editing, marker toggles)
///
/// Edits carry char offsets; the cursor itself is owned by the embedding
/// editor shell and arrives here only as positions.
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// Insert a single typed character (the keystroke path; may trigger
    /// the completion debounce)
    InsertChar { offset: usize, ch: char },
    /// Insert a block of text (paste, programmatic edit)
    InsertText { offset: usize, text: String },
    /// Insert a newline, honoring the smart-indent configuration
    InsertNewline { offset: usize },
    /// Delete the char range `start..end`
    DeleteRange { start: usize, end: usize },
    /// Set a marker on a line (e.g. gutter click translated to an index).
    /// Out-of-range indices are tolerated silently.
    SetMarker {
        line: usize,
        kind: MarkerKind,
        value: bool,
    },
    /// Toggle a marker on a line
    ToggleMarker { line: usize, kind: MarkerKind },
}

/// Lint coordination messages
#[derive(Debug, Clone)]
pub enum LintMsg {
    /// Manual trigger (on save or before execution); lint never runs per
    /// keystroke
    Run,
    /// Terminal event of an analysis worker: results on success, a reason
    /// string on failure. Exactly one per non-cancelled worker.
    Completed {
        request_id: u64,
        outcome: Result<Vec<LintFinding>, String>,
    },
}

/// Symbol outline messages
#[derive(Debug, Clone)]
pub enum SymbolsMsg {
    /// The debounce delay elapsed; refresh if the revision is still current
    RefreshReady { revision: u64 },
    /// Extraction finished on the worker
    RefreshCompleted { outline: SymbolOutline },
}

/// Completion pipeline messages
#[derive(Debug, Clone)]
pub enum CompletionMsg {
    /// The quiescent period elapsed; query the backend if the revision is
    /// still current
    TriggerReady {
        revision: u64,
        line: usize,
        column: usize,
    },
    /// Backend query finished (an empty list on any failure)
    Completed {
        request_id: u64,
        revision: u64,
        candidates: Vec<CompletionCandidate>,
    },
    /// Hide the completion popup and drop its candidates
    Dismiss,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    /// Document messages (editing, markers)
    Document(DocumentMsg),
    /// Lint coordination messages
    Lint(LintMsg),
    /// Symbol outline messages
    Symbols(SymbolsMsg),
    /// Completion pipeline messages
    Completion(CompletionMsg),
}

// Convenience constructors for common messages
impl Msg {
    /// Create an insert character message
    pub fn insert_char(offset: usize, ch: char) -> Self {
        Msg::Document(DocumentMsg::InsertChar { offset, ch })
    }

    /// Create a delete range message
    pub fn delete_range(start: usize, end: usize) -> Self {
        Msg::Document(DocumentMsg::DeleteRange { start, end })
    }

    /// Create a manual lint trigger message
    pub fn run_lint() -> Self {
        Msg::Lint(LintMsg::Run)
    }
}
