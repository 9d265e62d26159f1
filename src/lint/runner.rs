//! Lint worker protocol
//!
//! One analysis run: materialize the snapshot to a uniquely named artifact
//! in the session working directory, invoke the configured analyzer
//! scoped to its rule-set with the working directory as cwd, parse its
//! textual diagnostics keyed to the artifact path, and report exactly one
//! terminal outcome. The artifact handle is owned by this function, so
//! cleanup happens on every exit path.

use std::process::Command;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use regex::Regex;

use super::LintFinding;
use crate::config::LintConfig;
use crate::exec::run_with_deadline;
use crate::workdir::WorkDir;

/// Parse analyzer diagnostics of the form `<path>:<line>:<col>: <message>`
/// (the flake8/pylint text format), keyed to the artifact path. Lines not
/// matching the pattern or naming another file are ignored. Reported line
/// numbers are 1-based; findings are 0-based buffer indices.
pub fn parse_diagnostics(output: &str, artifact_path: &std::path::Path) -> Vec<LintFinding> {
    let pattern = format!(
        r"^{}:(\d+):(?:\d+:)?\s*(.+)$",
        regex::escape(&artifact_path.to_string_lossy())
    );
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    output
        .lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let reported: usize = caps.get(1)?.as_str().parse().ok()?;
            let message = caps.get(2)?.as_str().trim().to_string();
            Some(LintFinding {
                line_index: reported.saturating_sub(1),
                message,
            })
        })
        .collect()
}

/// Execute one analysis run.
///
/// Returns `Ok(None)` if the run was cancelled (superseded), `Ok(Some)`
/// with the parsed findings on a completed run, and `Err` when the
/// analyzer could not produce a verdict (spawn failure, timeout, or an
/// error exit without diagnostics).
pub(crate) fn run_analysis(
    config: &LintConfig,
    workdir: &WorkDir,
    snapshot: &str,
    suffix: &str,
    cancel: &Arc<AtomicBool>,
) -> Result<Option<Vec<LintFinding>>> {
    let artifact = workdir.artifact("lint-", suffix, snapshot)?;

    let mut command = Command::new(&config.program);
    command
        .args(&config.args)
        .arg(artifact.path())
        .current_dir(workdir.path());

    let output = run_with_deadline(
        command,
        Duration::from_millis(config.timeout_ms),
        Some(cancel),
    )?;

    let Some(output) = output else {
        tracing::debug!("lint run cancelled before the analyzer finished");
        remove_artifact(artifact);
        return Ok(None);
    };

    let findings = parse_diagnostics(&output.stdout, artifact.path());

    // Analyzers exit nonzero when they find problems, so the exit status
    // alone is not a failure signal: a run failed only when it produced no
    // parseable diagnostics and did not exit cleanly.
    if findings.is_empty() && !output.success {
        let reason = if output.stderr.trim().is_empty() {
            "analyzer exited with an error and no diagnostics".to_string()
        } else {
            output.stderr.trim().to_string()
        };
        remove_artifact(artifact);
        return Err(anyhow!("{}: {}", config.program, reason));
    }

    remove_artifact(artifact);
    Ok(Some(findings))
}

/// Cleanup failure is logged and never fatal: the run already has its
/// outcome, and the session working directory sweeps stragglers at
/// teardown anyway.
fn remove_artifact(artifact: tempfile::NamedTempFile) {
    if let Err(e) = artifact.close() {
        tracing::warn!("failed to remove lint artifact: {}", e);
    }
}
