//! Step outputs for later workflow steps, written to the file named by `GITHUB_OUTPUT`.

use anyhow::{Context, Result};
use release_sync_core::publish::PublishReport;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// `key=value` pairs exposed to later steps.
pub fn step_outputs(report: &PublishReport) -> Vec<(&'static str, String)> {
    vec![
        ("id", report.release_id.to_string()),
        ("html_url", report.html_url.clone().unwrap_or_default()),
        ("upload_url", report.upload_url.clone()),
    ]
}

/// Appends the outputs of `report` to `path`.
pub fn write_outputs(path: &Path, report: &PublishReport) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open step output file {}", path.display()))?;
    for (key, value) in step_outputs(report) {
        writeln!(file, "{key}={value}")
            .with_context(|| format!("Failed to write step output {key}"))?;
    }
    info!(path = %path.display(), "Wrote step outputs");
    Ok(())
}

/// Writes outputs when `GITHUB_OUTPUT` is set; a no-op otherwise.
pub fn write_outputs_from_env(report: &PublishReport) -> Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) if !path.is_empty() => write_outputs(Path::new(&path), report),
        _ => Ok(()),
    }
}
