//! Completion update handlers
//!
//! The trailing-edge debounce and both staleness gates live here. A timer
//! carries the revision it was armed against; only the timer matching the
//! current revision fires a query, so a burst of keystrokes yields exactly
//! one backend call, for the state after the last keystroke. A completed
//! query must match both the latest request id and the current revision
//! before its candidates are shown.

use crate::commands::Cmd;
use crate::config::AutocompleteMode;
use crate::messages::CompletionMsg;
use crate::model::EditorModel;

/// Handle completion messages
pub fn update_completion(model: &mut EditorModel, msg: CompletionMsg) -> Option<Cmd> {
    match msg {
        CompletionMsg::TriggerReady {
            revision,
            line,
            column,
        } => {
            if model.config.autocomplete == AutocompleteMode::Disabled {
                return None;
            }
            if model.document.revision != revision {
                tracing::debug!(
                    "skipping stale completion trigger: doc revision {} != timer revision {}",
                    model.document.revision,
                    revision
                );
                return None;
            }

            let request_id = model.completion.last_request + 1;
            model.completion.last_request = request_id;

            Some(Cmd::RunCompletion {
                request_id,
                revision,
                source: model.document.full_text(),
                line,
                column,
            })
        }

        CompletionMsg::Completed {
            request_id,
            revision,
            candidates,
        } => {
            if request_id != model.completion.last_request {
                tracing::debug!(
                    "discarding stale completion result: request {} != latest {}",
                    request_id,
                    model.completion.last_request
                );
                return None;
            }
            if revision != model.document.revision {
                tracing::debug!(
                    "discarding completion result for edited buffer: revision {} != {}",
                    revision,
                    model.document.revision
                );
                return None;
            }

            // Hide-on-empty is the consumer contract: failure and
            // no-candidates are indistinguishable here by design.
            model.completion.visible = !candidates.is_empty();
            model.completion.candidates = candidates;
            None
        }

        CompletionMsg::Dismiss => {
            model.completion.candidates.clear();
            model.completion.visible = false;
            None
        }
    }
}
