//! Fetch path: yt-dlp invocation, source probing and batch reporting

pub mod probe;
pub mod progress;
pub mod report;
pub mod ytdlp;

pub use probe::*;
pub use progress::*;
pub use report::*;
pub use ytdlp::*;
