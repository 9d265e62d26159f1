//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. Every staleness
//! decision lives here — lint request-id ordering, completion revision and
//! request checks, outline revision checks — so the policies are unit
//! testable without threads.

mod completion;
mod document;
mod lint;
mod symbols;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::EditorModel;

pub use completion::update_completion;
pub use document::update_document;
pub use lint::update_lint;
pub use symbols::update_symbols;

/// Main update function - dispatches to sub-handlers
pub fn update(model: &mut EditorModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Document(m) => document::update_document(model, m),
        Msg::Lint(m) => lint::update_lint(model, m),
        Msg::Symbols(m) => symbols::update_symbols(model, m),
        Msg::Completion(m) => completion::update_completion(model, m),
    }
}
