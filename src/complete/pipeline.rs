//! Single-slot completion worker
//!
//! Same supervision shape as the lint coordinator: at most one backend
//! query in flight, cancel-then-spawn replacement, results reported back
//! through the session channel. Every failure path degrades to an empty
//! candidate list so the consumer's hide-on-empty policy holds regardless
//! of cause.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::{CompletionBackend, CompletionCandidate};
use crate::messages::{CompletionMsg, Msg};
use crate::workdir::WorkDir;

struct Worker {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the session's single completion query slot
pub struct CompletionPipeline {
    backend: Arc<dyn CompletionBackend>,
    /// None when the session working directory could not be created:
    /// completions degrade to the empty list
    workdir: Option<Arc<WorkDir>>,
    tx: Sender<Msg>,
    worker: Option<Worker>,
}

impl CompletionPipeline {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        workdir: Option<Arc<WorkDir>>,
        tx: Sender<Msg>,
    ) -> Self {
        Self {
            backend,
            workdir,
            tx,
            worker: None,
        }
    }

    /// Query the backend for candidates against a snapshot.
    ///
    /// The snapshot is materialized to a uniquely named artifact before
    /// the query and removed afterwards. Reports
    /// `Msg::Completion(Completed)` with backend-ordered candidates, or
    /// with an empty list on any failure.
    pub fn request(
        &mut self,
        request_id: u64,
        revision: u64,
        source: String,
        suffix: &'static str,
        line: usize,
        column: usize,
    ) {
        let predecessor = self.worker.take().map(|worker| {
            worker.cancel.store(true, Ordering::Relaxed);
            worker
        });

        let backend = Arc::clone(&self.backend);
        let workdir = self.workdir.clone();
        let tx = self.tx.clone();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        let handle = std::thread::spawn(move || {
            if let Some(prev) = predecessor {
                let _ = prev.handle.join();
            }
            if worker_cancel.load(Ordering::Relaxed) {
                return;
            }

            let candidates = query_backend(&*backend, workdir.as_deref(), &source, suffix, line, column);

            // A result that was superseded while the backend ran is dropped
            // here; the update layer would discard it by request id anyway.
            if worker_cancel.load(Ordering::Relaxed) {
                return;
            }
            let _ = tx.send(Msg::Completion(CompletionMsg::Completed {
                request_id,
                revision,
                candidates,
            }));
        });

        self.worker = Some(Worker { cancel, handle });
    }

    /// Whether a query worker currently occupies the slot
    pub fn in_flight(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    /// Cancel and join the outstanding worker, if any
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.store(true, Ordering::Relaxed);
            let _ = worker.handle.join();
        }
    }
}

impl Drop for CompletionPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One backend query: artifact in, candidates out, empty on any failure
fn query_backend(
    backend: &dyn CompletionBackend,
    workdir: Option<&WorkDir>,
    source: &str,
    suffix: &str,
    line: usize,
    column: usize,
) -> Vec<CompletionCandidate> {
    let Some(workdir) = workdir else {
        tracing::debug!("completion unavailable: no session working directory");
        return Vec::new();
    };

    let artifact = match workdir.artifact("complete-", suffix, source) {
        Ok(artifact) => artifact,
        Err(e) => {
            tracing::warn!("failed to materialize completion snapshot: {}", e);
            return Vec::new();
        }
    };

    let candidates = match backend.complete(artifact.path(), line, column) {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::debug!("completion backend failed, hiding candidates: {}", e);
            Vec::new()
        }
    };

    // Cleanup failure is logged and never fatal; the session working
    // directory sweeps stragglers at teardown.
    if let Err(e) = artifact.close() {
        tracing::warn!("failed to remove completion artifact: {}", e);
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Msg;
    use anyhow::{anyhow, Result};
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;
    use std::time::Duration;

    struct FakeBackend {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeBackend {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl CompletionBackend for FakeBackend {
        fn complete(
            &self,
            source_path: &Path,
            line: usize,
            _column: usize,
        ) -> Result<Vec<CompletionCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("backend down"));
            }
            // The artifact must exist while the backend looks at it
            let contents = std::fs::read_to_string(source_path)?;
            Ok(vec![CompletionCandidate {
                label: format!("line{}:{}", line, contents.trim()),
                kind: super::super::CompletionKind::Other,
                detail: String::new(),
            }])
        }
    }

    fn recv_completed(rx: &mpsc::Receiver<Msg>) -> (u64, u64, Vec<CompletionCandidate>) {
        loop {
            match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
                Msg::Completion(CompletionMsg::Completed {
                    request_id,
                    revision,
                    candidates,
                }) => return (request_id, revision, candidates),
                _ => continue,
            }
        }
    }

    #[test]
    fn test_request_round_trip() {
        let (tx, rx) = mpsc::channel();
        let workdir = Arc::new(WorkDir::new().unwrap());
        let backend = FakeBackend::new(false);
        let mut pipeline =
            CompletionPipeline::new(backend.clone(), Some(Arc::clone(&workdir)), tx);

        pipeline.request(1, 5, "snapshot".to_string(), ".py", 0, 4);
        let (request_id, revision, candidates) = recv_completed(&rx);

        assert_eq!(request_id, 1);
        assert_eq!(revision, 5);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, "line0:snapshot");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backend_failure_yields_empty_list() {
        let (tx, rx) = mpsc::channel();
        let workdir = Arc::new(WorkDir::new().unwrap());
        let mut pipeline =
            CompletionPipeline::new(FakeBackend::new(true), Some(workdir), tx);

        pipeline.request(1, 1, "x".to_string(), ".py", 0, 0);
        let (_, _, candidates) = recv_completed(&rx);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_missing_workdir_yields_empty_list() {
        let (tx, rx) = mpsc::channel();
        let backend = FakeBackend::new(false);
        let mut pipeline = CompletionPipeline::new(backend.clone(), None, tx);

        pipeline.request(1, 1, "x".to_string(), ".py", 0, 0);
        let (_, _, candidates) = recv_completed(&rx);
        assert!(candidates.is_empty());
        // The backend was never consulted
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_artifacts_left_behind() {
        let (tx, rx) = mpsc::channel();
        let workdir = Arc::new(WorkDir::new().unwrap());
        let mut pipeline =
            CompletionPipeline::new(FakeBackend::new(false), Some(Arc::clone(&workdir)), tx);

        pipeline.request(1, 1, "x".to_string(), ".py", 0, 0);
        let _ = recv_completed(&rx);
        pipeline.shutdown();

        let leftovers: Vec<_> = std::fs::read_dir(workdir.path()).unwrap().collect();
        assert!(leftovers.is_empty(), "leftover artifacts: {:?}", leftovers);
    }
}
