//! Document update handlers
//!
//! Edits mutate the document and schedule the follow-on work: a debounced
//! outline refresh after every content change, and a debounced completion
//! trigger after identifier input when autocompletion is on. Marker
//! toggles touch marker state only and schedule nothing.

use crate::commands::Cmd;
use crate::config::AutocompleteMode;
use crate::messages::DocumentMsg;
use crate::model::EditorModel;

/// A character that extends the identifier (or attribute path) under the
/// cursor and should therefore restart the completion debounce timer
fn is_identifier_input(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}

/// Schedule the debounced outline refresh after a content change
fn schedule_symbol_refresh(model: &EditorModel) -> Option<Cmd> {
    if !model.document.language.has_highlighting() {
        return None;
    }
    Some(Cmd::ScheduleSymbolRefresh {
        revision: model.document.revision,
        delay_ms: model.config.symbols_debounce_ms,
    })
}

/// Handle document messages
pub fn update_document(model: &mut EditorModel, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::InsertChar { offset, ch } => {
            let mut buf = [0u8; 4];
            model.document.insert_text(offset, ch.encode_utf8(&mut buf));

            let mut cmds = Vec::new();
            if let Some(cmd) = schedule_symbol_refresh(model) {
                cmds.push(cmd);
            }

            if is_identifier_input(ch) && model.config.autocomplete == AutocompleteMode::Automatic
            {
                // Trailing-edge debounce: the timer carries the post-edit
                // revision; an older timer firing later fails the revision
                // check and is discarded, so only the last keystroke of a
                // burst triggers a query.
                let line = model.document.buffer.char_to_line(offset);
                let column = offset + 1 - model.document.buffer.line_to_char(line);
                cmds.push(Cmd::ScheduleCompletion {
                    revision: model.document.revision,
                    line,
                    column,
                    delay_ms: model.config.completion.debounce_ms,
                });
            }

            (!cmds.is_empty()).then(|| Cmd::batch(cmds))
        }

        DocumentMsg::InsertText { offset, text } => {
            if text.is_empty() {
                return None;
            }
            model.document.insert_text(offset, &text);
            dismiss_completions(model);
            schedule_symbol_refresh(model)
        }

        DocumentMsg::InsertNewline { offset } => {
            model
                .document
                .insert_newline_with_indent(offset, model.config.smart_indent);
            dismiss_completions(model);
            schedule_symbol_refresh(model)
        }

        DocumentMsg::DeleteRange { start, end } => {
            if start == end {
                return None;
            }
            model.document.delete_range(start, end);
            dismiss_completions(model);
            schedule_symbol_refresh(model)
        }

        DocumentMsg::SetMarker { line, kind, value } => {
            model.document.set_marker(line, kind, value);
            None
        }

        DocumentMsg::ToggleMarker { line, kind } => {
            model.document.toggle_marker(line, kind);
            None
        }
    }
}

/// Non-identifier edits close the completion popup; the revision checks
/// already prevent stale results from landing, this only clears what is
/// currently shown.
fn dismiss_completions(model: &mut EditorModel) {
    model.completion.candidates.clear();
    model.completion.visible = false;
}
