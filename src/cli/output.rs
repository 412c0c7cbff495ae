//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::fetch::progress::{format_bytes, Progress};
use crate::fetch::report::{BatchReport, BatchStatus};
use crate::policy::AlignmentDecision;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Output formatter for fetchmux
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: Mutex::new(None),
        }
    }

    /// Update the percent-based progress bar, creating it on first use
    pub fn update_progress(&self, progress: &Progress) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let mut guard = match self.progress_bar.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        let bar = guard.get_or_insert_with(|| {
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap()
                .progress_chars("#>-");
            let bar = ProgressBar::new(100);
            bar.set_style(style);
            bar
        });

        bar.set_position(progress.percent.clamp(0.0, 100.0) as u64);
        let mut msg = String::new();
        if let Some(total) = progress.total_bytes {
            msg.push_str(&format!("of {} ", format_bytes(total)));
        }
        if let Some(speed) = progress.speed {
            msg.push_str(&format!("{}/s", format_bytes(speed as u64)));
        }
        if let Some(eta) = progress.eta {
            msg.push_str(&format!(" ETA {}s", eta.as_secs()));
        }
        bar.set_message(msg);
    }

    /// Finish and clear the progress bar, if one was started
    pub fn finish_progress(&self) {
        if let Ok(mut guard) = self.progress_bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("ℹ️  {}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("✅ {}", message.green());
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("⚠️  {}", message.yellow());
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message.red());
    }

    /// Print debug message
    pub fn debug(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose {
            println!("🐛 {}", message.dimmed());
        }
    }

    /// Print fetch start message
    pub fn print_fetch_start(&self, url: &str) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }
        println!("🚀 Fetching from: {}", url);
    }

    /// Print the final batch summary with per-item outcomes
    pub fn print_batch_summary(&self, report: &BatchReport) {
        let total = report.outcomes().len();
        for outcome in report.outcomes() {
            if outcome.is_ok() {
                if self.verbosity != VerbosityLevel::Quiet {
                    println!("📥 [{}/{}] {}", outcome.index, total, outcome.title);
                }
            } else {
                self.error(&format!(
                    "[{}/{}] {}: {}",
                    outcome.index,
                    total,
                    outcome.title,
                    outcome.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }

        match report.status() {
            BatchStatus::Complete => {
                self.success(&format!("Downloaded {} item(s)", report.succeeded()));
                if let Some(title) = &report.collection_title {
                    self.info(&format!("Files are in the '{}' directory", title));
                }
            }
            BatchStatus::CompleteWithErrors => {
                self.warning(&format!(
                    "Completed with errors: {} succeeded, {} failed",
                    report.succeeded(),
                    report.failed()
                ));
            }
            BatchStatus::Failed => {
                self.error("All items failed");
            }
        }
    }

    /// Print merge start message
    pub fn print_merge_start(&self, video: &str, audio: &str) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }
        println!("🎬 Video: {}", video);
        println!("🎵 Audio: {}", audio);
    }

    /// Explain the alignment decision that was applied
    pub fn print_alignment(&self, decision: AlignmentDecision) {
        match decision {
            AlignmentDecision::Truncate { at } => {
                self.info(&format!("Audio cut to match video duration ({:.2}s)", at));
            }
            AlignmentDecision::AllowTrailingSilence => {
                self.info("Audio is shorter than the video; the remainder plays without sound");
            }
            AlignmentDecision::NoChange => {}
        }
    }

    /// Print merge completion message
    pub fn print_merge_complete(&self, output: &str) {
        self.success(&format!("Video merged and saved to {}", output));
    }
}
