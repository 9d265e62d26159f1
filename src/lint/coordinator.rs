//! Single-slot lint worker supervision
//!
//! The coordinator owns at most one background worker. Submitting while a
//! worker is running flips that worker's cancel flag and hands its join
//! handle to the replacement, which joins it before starting any analysis:
//! cancel-then-spawn, so the at-most-one-live-analysis invariant holds
//! deterministically and the submitting thread never blocks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::runner::run_analysis;
use crate::config::LintConfig;
use crate::messages::{LintMsg, Msg};
use crate::workdir::WorkDir;

/// Observable coordinator lifecycle, for consumers and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintPhase {
    /// No request outstanding
    Idle,
    /// Exactly one worker is analyzing the most recent snapshot
    Running,
    /// A new request arrived while Running; the replacement is waiting for
    /// the superseded worker to wind down
    Superseded,
}

struct Worker {
    request_id: u64,
    cancel: Arc<AtomicBool>,
    /// Set by the worker thread once its predecessor has been joined
    started: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the session's single analysis worker slot
pub struct LintCoordinator {
    config: LintConfig,
    /// None when the session working directory could not be created:
    /// linting is unavailable but the session lives on
    workdir: Option<Arc<WorkDir>>,
    tx: Sender<Msg>,
    worker: Option<Worker>,
}

impl LintCoordinator {
    pub fn new(config: LintConfig, workdir: Option<Arc<WorkDir>>, tx: Sender<Msg>) -> Self {
        Self {
            config,
            workdir,
            tx,
            worker: None,
        }
    }

    /// Submit a snapshot for analysis under the given request id.
    ///
    /// Ids are assigned by the update layer and must be monotonically
    /// increasing; the result is reported as `Msg::Lint(Completed)` unless
    /// this request is itself superseded before the analyzer finishes.
    pub fn submit(&mut self, request_id: u64, snapshot: String, suffix: &'static str) {
        let Some(workdir) = self.workdir.clone() else {
            let _ = self.tx.send(Msg::Lint(LintMsg::Completed {
                request_id,
                outcome: Err("linting unavailable: no session working directory".to_string()),
            }));
            return;
        };

        // Cancel-then-spawn: flag the incumbent, let the replacement join it.
        let predecessor = self.worker.take().map(|worker| {
            tracing::debug!(
                "lint request {} supersedes request {}",
                request_id,
                worker.request_id
            );
            worker.cancel.store(true, Ordering::Relaxed);
            worker
        });

        let cancel = Arc::new(AtomicBool::new(false));
        let started = Arc::new(AtomicBool::new(false));
        let config = self.config.clone();
        let tx = self.tx.clone();
        let worker_cancel = Arc::clone(&cancel);
        let worker_started = Arc::clone(&started);

        let handle = std::thread::spawn(move || {
            if let Some(prev) = predecessor {
                let _ = prev.handle.join();
            }
            worker_started.store(true, Ordering::Relaxed);

            // Superseded while waiting for the predecessor: nothing to do,
            // and nothing may be emitted.
            if worker_cancel.load(Ordering::Relaxed) {
                return;
            }

            let outcome = run_analysis(&config, &workdir, &snapshot, suffix, &worker_cancel);
            match outcome {
                Ok(None) => {
                    tracing::debug!("lint request {} cancelled mid-run", request_id);
                }
                Ok(Some(findings)) => {
                    let _ = tx.send(Msg::Lint(LintMsg::Completed {
                        request_id,
                        outcome: Ok(findings),
                    }));
                }
                Err(e) => {
                    let _ = tx.send(Msg::Lint(LintMsg::Completed {
                        request_id,
                        outcome: Err(e.to_string()),
                    }));
                }
            }
        });

        self.worker = Some(Worker {
            request_id,
            cancel,
            started,
            handle,
        });
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> LintPhase {
        match &self.worker {
            None => LintPhase::Idle,
            Some(worker) if worker.handle.is_finished() => LintPhase::Idle,
            Some(worker) if !worker.started.load(Ordering::Relaxed) => LintPhase::Superseded,
            Some(_) => LintPhase::Running,
        }
    }

    /// Request id of the worker currently occupying the slot, if any
    pub fn active_request(&self) -> Option<u64> {
        self.worker
            .as_ref()
            .filter(|w| !w.handle.is_finished())
            .map(|w| w.request_id)
    }

    /// Cancel and join the outstanding worker, if any. Called at session
    /// teardown so the working directory outlives every artifact handle.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.store(true, Ordering::Relaxed);
            let _ = worker.handle.join();
        }
    }
}

impl Drop for LintCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
