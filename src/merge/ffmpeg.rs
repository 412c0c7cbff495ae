//! Audio-track replacement
//!
//! Takes an existing video file and a replacement audio file, probes both
//! durations, applies the alignment policy and runs ffmpeg once. The output
//! always carries the fixed mp4-compatible codec pair (libx264 video, aac
//! audio).

use crate::error::FetchmuxError;
use crate::merge::ffprobe::probe_duration;
use crate::policy::{align_tracks, AlignmentDecision, TrackPair};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Audio-track replacer backed by the ffmpeg and ffprobe executables
pub struct Merger {
    ffmpeg_binary: String,
    ffprobe_binary: String,
    timeout: Duration,
}

impl Merger {
    /// Create a merger using `ffmpeg`/`ffprobe` from PATH
    pub fn new() -> Self {
        Self {
            ffmpeg_binary: "ffmpeg".to_string(),
            ffprobe_binary: "ffprobe".to_string(),
            timeout: Duration::from_secs(3600),
        }
    }

    /// Use a specific ffmpeg binary
    pub fn with_ffmpeg_binary(mut self, binary: impl Into<String>) -> Self {
        self.ffmpeg_binary = binary.into();
        self
    }

    /// Use a specific ffprobe binary
    pub fn with_ffprobe_binary(mut self, binary: impl Into<String>) -> Self {
        self.ffprobe_binary = binary.into();
        self
    }

    /// Timeout for each collaborator invocation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace `video`'s audio track with `audio`, writing the result to
    /// `output`. Returns the alignment decision that was applied.
    pub async fn merge(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<AlignmentDecision, FetchmuxError> {
        for input in [video, audio] {
            if !input.is_file() {
                return Err(FetchmuxError::SourceFileMissing(
                    input.display().to_string(),
                ));
            }
        }

        let pair = TrackPair::new(
            probe_duration(&self.ffprobe_binary, video, self.timeout).await?,
            probe_duration(&self.ffprobe_binary, audio, self.timeout).await?,
        )?;
        let decision = align_tracks(pair);

        match decision {
            AlignmentDecision::Truncate { at } => {
                info!("Replacement audio is longer; cutting at {:.2}s", at)
            }
            AlignmentDecision::AllowTrailingSilence => info!(
                "Replacement audio is shorter; it stops at {:.2}s and the video continues without sound",
                pair.audio_duration
            ),
            AlignmentDecision::NoChange => debug!("Track durations already match"),
        }

        let args = build_merge_args(video, audio, output, decision);
        debug!("{} {}", self.ffmpeg_binary, args.join(" "));

        let result = self.run_ffmpeg(&args).await;
        if result.is_err() {
            // No partial output on failure
            let _ = std::fs::remove_file(output);
        }
        result?;

        info!("Merged file written to {}", output.display());
        Ok(decision)
    }

    async fn run_ffmpeg(&self, args: &[String]) -> Result<(), FetchmuxError> {
        let mut cmd = Command::new(&self.ffmpeg_binary);
        cmd.args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| FetchmuxError::Timeout {
                tool: self.ffmpeg_binary.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchmuxError::CollaboratorMissing {
                        tool: self.ffmpeg_binary.clone(),
                        source: e,
                    }
                } else {
                    FetchmuxError::IoError(e)
                }
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let start = lines.len().saturating_sub(5);
            Err(FetchmuxError::Collaborator {
                tool: self.ffmpeg_binary.clone(),
                message: lines[start..].join("\n"),
            })
        }
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the ffmpeg argument list for one merge.
///
/// Video comes from input 0, audio from input 1. Only a Truncate decision
/// adds a duration clamp; shorter audio is left to run out on its own.
fn build_merge_args(
    video: &Path,
    audio: &Path,
    output: &Path,
    decision: AlignmentDecision,
) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-i".to_string(),
        video.display().to_string(),
        "-i".to_string(),
        audio.display().to_string(),
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        "1:a:0".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
    ];

    if let AlignmentDecision::Truncate { at } = decision {
        args.push("-t".to_string());
        args.push(at.to_string());
    }

    args.push(output.display().to_string());
    args
}
