//! # fetchmux - video fetcher and audio-track replacer
//!
//! Downloads single videos or whole playlists through the `yt-dlp`
//! executable and replaces a video's audio track through `ffmpeg`.
//!
//! ## Features
//!
//! - Resolution-capped format selection with strict lexical fallback
//! - Playlist downloads with per-item failure reporting
//! - Cookie-file authentication for private content
//! - Audio-track replacement with deterministic duration alignment
//!
//! ## Example
//!
//! ```rust,no_run
//! use fetchmux::fetch::YtDlpFetcher;
//! use fetchmux::policy::MediaRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = MediaRequest::new("VIDEO_URL").with_max_height(1080);
//!     let fetcher = YtDlpFetcher::new();
//!
//!     let report = fetcher.fetch(&request).await?;
//!     println!("Downloaded {} items", report.succeeded());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod policy;
pub mod utils;

// Re-export main types
pub use error::FetchmuxError;
pub use fetch::{BatchReport, BatchStatus, ItemOutcome, YtDlpFetcher};
pub use merge::Merger;
pub use policy::{
    align_tracks, build_format_query, choose_output_layout, AlignmentDecision, FormatQuery,
    MediaRequest, OutputLayout, TrackPair,
};

/// Result type alias for fetchmux operations
pub type Result<T> = std::result::Result<T, FetchmuxError>;
