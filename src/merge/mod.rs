//! Merge path: audio-track replacement via ffmpeg

pub mod ffmpeg;
pub mod ffprobe;

pub use ffmpeg::*;
pub use ffprobe::*;

/// Default output path when the caller does not name one
pub const DEFAULT_MERGE_OUTPUT: &str = "merged_output.mp4";
