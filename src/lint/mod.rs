//! Lint coordination
//!
//! Owns a single background analysis worker per session. Snapshots are
//! submitted with monotonically increasing request ids; a newer submission
//! supersedes the worker still running, which is cancelled and joined by
//! the replacement before any new analysis starts, so at most one analyzer
//! process is ever alive for a session.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──submit──▶ Running ──submit──▶ Superseded (old worker winding down)
//!   ▲                 │                     │
//!   └─── Completed ◀──┘   new worker joins old, then ──▶ Running
//! ```
//!
//! The worker protocol lives in [`runner`]: snapshot → unique artifact →
//! analyzer process (bounded) → parsed `(line, message)` findings → one
//! terminal message. Artifacts are removed on success, failure and
//! cancellation alike.

mod coordinator;
mod runner;

pub use coordinator::{LintCoordinator, LintPhase};
pub use runner::parse_diagnostics;

/// A single analyzer finding mapped back to the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    /// 0-based buffer line
    pub line_index: usize,
    pub message: String,
}
