//! Duration probing via ffprobe

use crate::error::FetchmuxError;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: String,
}

/// Extract the container duration in seconds from ffprobe's JSON output
pub fn parse_duration_output(json: &str) -> Result<f64, FetchmuxError> {
    let doc: ProbeDocument = serde_json::from_str(json)?;
    doc.format
        .duration
        .parse::<f64>()
        .map_err(|e| FetchmuxError::ProbeFailed(format!("bad duration value: {}", e)))
}

/// Probe a media file's duration in seconds
pub async fn probe_duration(
    binary: &str,
    path: &Path,
    timeout: Duration,
) -> Result<f64, FetchmuxError> {
    let mut cmd = Command::new(binary);
    cmd.args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("Probing duration of {}", path.display());

    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| FetchmuxError::Timeout {
            tool: binary.to_string(),
            seconds: timeout.as_secs(),
        })?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchmuxError::CollaboratorMissing {
                    tool: binary.to_string(),
                    source: e,
                }
            } else {
                FetchmuxError::IoError(e)
            }
        })?;

    if !output.status.success() {
        return Err(FetchmuxError::ProbeFailed(format!(
            "{}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    parse_duration_output(&String::from_utf8_lossy(&output.stdout))
}
