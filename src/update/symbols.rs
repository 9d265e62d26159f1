//! Symbol outline update handlers
//!
//! The debounce flow: an edit schedules `RefreshReady` for its revision;
//! when the timer fires, the revision is checked against the document and
//! a stale timer (an edit happened during the delay) is dropped — the
//! newer edit scheduled its own timer. Completed extractions are checked
//! the same way before they replace the outline.

use crate::commands::Cmd;
use crate::messages::SymbolsMsg;
use crate::model::EditorModel;

/// Handle symbol outline messages
pub fn update_symbols(model: &mut EditorModel, msg: SymbolsMsg) -> Option<Cmd> {
    match msg {
        SymbolsMsg::RefreshReady { revision } => {
            if model.document.revision != revision {
                tracing::debug!(
                    "skipping stale outline refresh: doc revision {} != timer revision {}",
                    model.document.revision,
                    revision
                );
                return None;
            }

            Some(Cmd::RunSymbolRefresh {
                revision,
                source: model.document.full_text(),
            })
        }

        SymbolsMsg::RefreshCompleted { outline } => {
            if model.document.revision != outline.revision {
                tracing::debug!(
                    "discarding stale outline: doc revision {} != outline revision {}",
                    model.document.revision,
                    outline.revision
                );
                return None;
            }

            model.symbols.outline = Some(outline);
            None
        }
    }
}
