//! Model types for the Elm-style architecture
//!
//! [`EditorModel`] aggregates everything the update functions operate on:
//! the document, the session configuration and theme, and the bookkeeping
//! state of the three background facilities (lint, symbols, completion).

mod document;

pub use document::{Document, Line, LineId, MarkerKind};

use crate::complete::CompletionCandidate;
use crate::config::EditorConfig;
use crate::outline::SymbolOutline;
use crate::theme::Theme;

/// Lint coordination bookkeeping.
///
/// Request ids are monotonically increasing; only the result matching the
/// most recently submitted request may touch the document's annotations.
#[derive(Debug, Clone, Default)]
pub struct LintState {
    /// Id of the most recently submitted request (0 = none yet)
    pub last_submitted: u64,
    /// Document revision the most recent snapshot was taken at; a result
    /// arriving after a further edit no longer matches the buffer and is
    /// discarded
    pub submitted_revision: u64,
    /// Id of the most recently terminated request (applied or discarded)
    pub last_applied: u64,
    /// Advisory diagnostic from a failed analyzer run; never written into
    /// line annotations
    pub advisory: Option<String>,
}

impl LintState {
    /// Whether a submitted request has not yet produced an applied result
    /// or failure
    pub fn in_flight(&self) -> bool {
        self.last_submitted > self.last_applied
    }
}

/// Completion pipeline bookkeeping
#[derive(Debug, Clone, Default)]
pub struct CompletionState {
    /// Id of the most recently started backend query (0 = none yet)
    pub last_request: u64,
    /// Candidates from the most recent applied result, backend order
    pub candidates: Vec<CompletionCandidate>,
    /// Whether the consumer should show the completion UI.
    /// Policy: hidden whenever `candidates` is empty, whatever the cause.
    pub visible: bool,
}

/// Symbol outline bookkeeping
#[derive(Debug, Clone, Default)]
pub struct SymbolsState {
    /// Most recently extracted outline; stale until the next debounce fires,
    /// which is tolerable for an advisory view
    pub outline: Option<SymbolOutline>,
}

/// Aggregate session state operated on by the update functions
#[derive(Debug, Clone)]
pub struct EditorModel {
    pub document: Document,
    pub config: EditorConfig,
    pub theme: Theme,
    pub lint: LintState,
    pub completion: CompletionState,
    pub symbols: SymbolsState,
}

impl EditorModel {
    /// Create a model around a document with explicit configuration and
    /// theme (no ambient state)
    pub fn new(document: Document, config: EditorConfig, theme: Theme) -> Self {
        Self {
            document,
            config,
            theme,
            lint: LintState::default(),
            completion: CompletionState::default(),
            symbols: SymbolsState::default(),
        }
    }

    /// Replace the active theme (theme switch); the new table applies from
    /// the next highlight pass
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}
