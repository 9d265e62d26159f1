//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an
//! update: starting debounce timers, launching background analysis, and
//! submitting work to the single-slot coordinators. The update layer only
//! decides; the session executes.

/// Commands returned by update functions
#[derive(Debug, Clone)]
pub enum Cmd {
    /// Execute multiple commands
    Batch(Vec<Cmd>),

    // === Symbol Outline Commands ===
    /// Start the debounce timer for an outline refresh.
    /// After delay_ms, sends Msg::Symbols(RefreshReady).
    ScheduleSymbolRefresh { revision: u64, delay_ms: u64 },
    /// Run symbol extraction against a snapshot in the background.
    /// Sends Msg::Symbols(RefreshCompleted) when done.
    RunSymbolRefresh { revision: u64, source: String },

    // === Completion Commands ===
    /// Start the trailing-edge debounce timer for a completion query.
    /// After delay_ms, sends Msg::Completion(TriggerReady).
    ScheduleCompletion {
        revision: u64,
        line: usize,
        column: usize,
        delay_ms: u64,
    },
    /// Query the completion backend against a snapshot.
    /// Sends Msg::Completion(Completed) when done, empty on failure.
    RunCompletion {
        request_id: u64,
        revision: u64,
        source: String,
        line: usize,
        column: usize,
    },

    // === Lint Commands ===
    /// Submit a snapshot to the lint coordinator. Supersedes any worker
    /// still running; sends Msg::Lint(Completed) unless superseded again.
    RunLint { request_id: u64, snapshot: String },
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Flatten this command into a list of leaf commands
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            leaf => vec![leaf],
        }
    }
}
