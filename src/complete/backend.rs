//! Completion backend seam
//!
//! The pipeline talks to the code-intelligence service through the
//! [`CompletionBackend`] trait; the production implementation spawns the
//! configured external process. Tests substitute an in-process fake.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use super::{CompletionCandidate, CompletionKind};
use crate::config::CompletionConfig;
use crate::exec::run_with_deadline;

/// A code-intelligence service answering completion queries.
///
/// `source_path` points at a materialized snapshot of the buffer; the
/// backend may resolve imports and project context relative to it.
pub trait CompletionBackend: Send + Sync {
    fn complete(
        &self,
        source_path: &Path,
        line: usize,
        column: usize,
    ) -> Result<Vec<CompletionCandidate>>;
}

/// Wire format: a JSON array of candidate objects on stdout
#[derive(Debug, Deserialize)]
struct WireCandidate {
    label: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    detail: String,
}

fn kind_from_wire(kind: &str) -> CompletionKind {
    match kind {
        "function" | "method" => CompletionKind::Function,
        "class" | "type" => CompletionKind::Class,
        _ => CompletionKind::Other,
    }
}

/// Parse the backend's JSON candidate array, preserving its order
pub(crate) fn parse_candidates(json: &str) -> Result<Vec<CompletionCandidate>> {
    let wire: Vec<WireCandidate> =
        serde_json::from_str(json).context("malformed completion response")?;
    Ok(wire
        .into_iter()
        .map(|c| CompletionCandidate {
            kind: kind_from_wire(&c.kind),
            label: c.label,
            detail: c.detail,
        })
        .collect())
}

/// Backend implementation that spawns the configured external command.
///
/// The command receives the snapshot path, 0-based line and column as
/// trailing arguments and must print the candidate array on stdout.
pub struct ProcessBackend {
    config: CompletionConfig,
}

impl ProcessBackend {
    pub fn new(config: CompletionConfig) -> Self {
        Self { config }
    }
}

impl CompletionBackend for ProcessBackend {
    fn complete(
        &self,
        source_path: &Path,
        line: usize,
        column: usize,
    ) -> Result<Vec<CompletionCandidate>> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg(source_path)
            .arg(line.to_string())
            .arg(column.to_string());

        let output = run_with_deadline(
            command,
            Duration::from_millis(self.config.timeout_ms),
            None,
        )?
        .ok_or_else(|| anyhow!("completion backend run was cancelled"))?;

        if !output.success {
            return Err(anyhow!(
                "{} exited with an error: {}",
                self.config.program,
                output.stderr.trim()
            ));
        }

        parse_candidates(&output.stdout)
    }
}
