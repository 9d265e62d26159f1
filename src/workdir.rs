//! Session-scoped temporary working directory
//!
//! One directory per session holds every analysis artifact: the snapshot
//! files handed to the external analyzer and the completion backend. Each
//! in-flight request gets its own collision-resistantly named file, so
//! concurrent lint/completion work never races on a path. Artifacts are
//! removed when their request finishes (the handle drops with the worker)
//! and the whole directory is removed at session teardown.

use std::path::Path;

use anyhow::{Context, Result};
use tempfile::{Builder, NamedTempFile, TempDir};

/// The session working directory.
///
/// Failing to create it is fatal to the lint and completion features (they
/// become unavailable), never to the editing session itself.
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    /// Create the working directory for a new session
    pub fn new() -> Result<Self> {
        let dir = Builder::new()
            .prefix("scribe-")
            .tempdir()
            .context("failed to create session working directory")?;
        tracing::debug!("session working directory at {}", dir.path().display());
        Ok(Self { dir })
    }

    /// The directory path (analyzers run with this as their working dir)
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Materialize a snapshot to a uniquely named artifact inside the
    /// working directory.
    ///
    /// The returned handle owns the file: dropping it removes the
    /// artifact, which ties cleanup to the worker's lifetime on success,
    /// failure and cancellation alike.
    pub fn artifact(&self, prefix: &str, suffix: &str, contents: &str) -> Result<NamedTempFile> {
        let file = Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(self.dir.path())
            .context("failed to create analysis artifact")?;
        std::fs::write(file.path(), contents)
            .with_context(|| format!("failed to write artifact {}", file.path().display()))?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_written_and_unique() {
        let workdir = WorkDir::new().unwrap();
        let a = workdir.artifact("lint-", ".py", "x = 1\n").unwrap();
        let b = workdir.artifact("lint-", ".py", "y = 2\n").unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(workdir.path()));
        assert_eq!(std::fs::read_to_string(a.path()).unwrap(), "x = 1\n");
        assert_eq!(std::fs::read_to_string(b.path()).unwrap(), "y = 2\n");
    }

    #[test]
    fn test_artifact_removed_on_drop() {
        let workdir = WorkDir::new().unwrap();
        let path = {
            let artifact = workdir.artifact("lint-", ".py", "x = 1\n").unwrap();
            artifact.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_teardown_removes_directory_and_stragglers() {
        let (dir_path, kept) = {
            let workdir = WorkDir::new().unwrap();
            let artifact = workdir.artifact("straggler-", ".py", "").unwrap();
            // Simulate a worker that never got to drop its handle cleanly
            let (_, kept) = artifact.keep().unwrap();
            (workdir.path().to_path_buf(), kept)
        };
        assert!(!kept.exists());
        assert!(!dir_path.exists());
    }
}
