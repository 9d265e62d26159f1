//! Lint update handlers
//!
//! `Run` snapshots the buffer and hands it to the coordinator under a
//! fresh request id. `Completed` applies results only when the id still
//! matches the latest submission — a result raced by a newer submission
//! (or by the edit that triggered it) is discarded without touching the
//! document's annotations.

use crate::commands::Cmd;
use crate::messages::LintMsg;
use crate::model::EditorModel;

/// Handle lint messages
pub fn update_lint(model: &mut EditorModel, msg: LintMsg) -> Option<Cmd> {
    match msg {
        LintMsg::Run => {
            let request_id = model.lint.last_submitted + 1;
            model.lint.last_submitted = request_id;
            model.lint.submitted_revision = model.document.revision;
            model.lint.advisory = None;

            tracing::debug!("lint run requested, request {}", request_id);

            Some(Cmd::RunLint {
                request_id,
                snapshot: model.document.full_text(),
            })
        }

        LintMsg::Completed {
            request_id,
            outcome,
        } => {
            // Only the newest submission may land; anything else is stale.
            if request_id != model.lint.last_submitted {
                tracing::debug!(
                    "discarding stale lint result: request {} != latest {}",
                    request_id,
                    model.lint.last_submitted
                );
                return None;
            }
            // A result older than what already landed never applies, even
            // if bookkeeping were perturbed.
            if request_id <= model.lint.last_applied {
                tracing::debug!(
                    "discarding out-of-order lint result: request {} <= applied {}",
                    request_id,
                    model.lint.last_applied
                );
                return None;
            }

            model.lint.last_applied = request_id;

            // An edit after submission invalidates the snapshot: the
            // request terminates without touching annotations keyed to
            // lines that may have shifted.
            if model.document.revision != model.lint.submitted_revision {
                tracing::debug!(
                    "discarding lint result for edited buffer: revision {} != {}",
                    model.lint.submitted_revision,
                    model.document.revision
                );
                return None;
            }

            match outcome {
                Ok(findings) => {
                    let annotations: Vec<(usize, String)> = findings
                        .into_iter()
                        .map(|f| (f.line_index, f.message))
                        .collect();
                    tracing::debug!(
                        "applying {} lint annotations for request {}",
                        annotations.len(),
                        request_id
                    );
                    model.document.set_error_annotations(&annotations);
                    model.lint.advisory = None;
                }
                Err(reason) => {
                    // Analyzer failure: annotations untouched, the reason
                    // surfaces as an advisory diagnostic only.
                    tracing::warn!("lint request {} failed: {}", request_id, reason);
                    model.lint.advisory = Some(reason);
                }
            }

            None
        }
    }
}
