//! Command line argument parsing

use crate::policy::MediaRequest;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// fetchmux - download videos/playlists and replace audio tracks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Download a video or playlist, merging streams into one container
    Fetch(FetchArgs),
    /// Replace a video's audio track
    Merge(MergeArgs),
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Video or playlist URL
    pub url: String,

    /// Maximum video height in pixels (e.g., 1080); 0 means no cap
    #[arg(long, value_name = "HEIGHT")]
    pub max_height: Option<u32>,

    /// Preferred video codec family (e.g., 'avc', 'vp9')
    #[arg(long, value_name = "CODEC")]
    pub vcodec: Option<String>,

    /// Output container
    #[arg(long, value_name = "EXT", default_value = "mp4")]
    pub container: String,

    /// Netscape-format cookie file for private content
    #[arg(long, value_name = "PATH")]
    pub cookies: Option<PathBuf>,

    /// Directory to place downloads under
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Max items to fetch from a playlist (0 means all)
    #[arg(long, default_value = "0")]
    pub limit: usize,

    /// Also save each item's description
    #[arg(long)]
    pub write_description: bool,

    /// Per-item timeout for the downloader (e.g., 30m, 2h)
    #[arg(long, value_name = "DURATION", default_value = "2h")]
    pub timeout: humantime::Duration,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// yt-dlp binary to invoke
    #[arg(long, value_name = "PATH", default_value = "yt-dlp")]
    pub ytdlp_bin: String,
}

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Input video file
    #[arg(long, value_name = "PATH")]
    pub video: PathBuf,

    /// Replacement audio file
    #[arg(long, value_name = "PATH")]
    pub audio: PathBuf,

    /// Output file
    #[arg(short, long, value_name = "PATH", default_value = crate::merge::DEFAULT_MERGE_OUTPUT)]
    pub output: PathBuf,

    /// Timeout for each encoder invocation (e.g., 30m, 1h)
    #[arg(long, value_name = "DURATION", default_value = "1h")]
    pub timeout: humantime::Duration,

    /// ffmpeg binary to invoke
    #[arg(long, value_name = "PATH", default_value = "ffmpeg")]
    pub ffmpeg_bin: String,

    /// ffprobe binary to invoke
    #[arg(long, value_name = "PATH", default_value = "ffprobe")]
    pub ffprobe_bin: String,
}

impl Args {
    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

impl FetchArgs {
    /// Build the media request this invocation describes
    pub fn to_media_request(&self) -> MediaRequest {
        let mut request =
            MediaRequest::new(self.url.trim()).with_container(self.container.clone());
        if let Some(height) = self.max_height {
            request = request.with_max_height(height);
        }
        if let Some(codec) = &self.vcodec {
            request = request.with_video_codec(codec.clone());
        }
        if let Some(cookies) = &self.cookies {
            request = request.with_cookies_file(cookies.clone());
        }
        request.write_description = self.write_description;
        request
    }

    /// Get downloader timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }
}

impl MergeArgs {
    /// Get encoder timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}
