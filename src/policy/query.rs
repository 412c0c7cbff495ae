//! Format query construction
//!
//! A [`FormatQuery`] is an ordered fallback chain of stream-selection
//! expressions. The downloading collaborator evaluates the expressions in
//! order against the source's advertised streams and takes the first one it
//! can fully satisfy. The chain is never reordered and expressions are never
//! partially combined across entries.

use std::fmt;

/// What to fetch: a source locator plus optional selection constraints
#[derive(Debug, Clone)]
pub struct MediaRequest {
    /// URL of the video or playlist
    pub source_locator: String,
    /// Maximum video height in pixels (e.g., 1080)
    pub max_height: Option<u32>,
    /// Preferred video codec family (prefix match, e.g., "avc")
    pub preferred_video_codec: Option<String>,
    /// Output container identifier
    pub preferred_container: String,
    /// Optional path to a Netscape-format cookie file
    pub cookies_file: Option<std::path::PathBuf>,
    /// Also write the item description next to the media file
    pub write_description: bool,
}

impl MediaRequest {
    /// Create a request for a source locator with default constraints (mp4, no cap)
    pub fn new(source_locator: impl Into<String>) -> Self {
        Self {
            source_locator: source_locator.into(),
            max_height: None,
            preferred_video_codec: None,
            preferred_container: "mp4".to_string(),
            cookies_file: None,
            write_description: false,
        }
    }

    /// Cap video height. Zero is treated as "no cap".
    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = if height > 0 { Some(height) } else { None };
        self
    }

    /// Prefer a video codec family (prefix match against the stream's vcodec)
    pub fn with_video_codec(mut self, codec: impl Into<String>) -> Self {
        self.preferred_video_codec = Some(codec.into());
        self
    }

    /// Set the output container
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.preferred_container = container.into();
        self
    }

    /// Authenticate with a cookie file
    pub fn with_cookies_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.cookies_file = Some(path.into());
        self
    }
}

/// Constraint on the video half of a split selection
#[derive(Debug, Clone, PartialEq)]
pub struct VideoConstraint {
    /// Height ceiling; streams above it are excluded, streams below it are not
    pub max_height: Option<u32>,
    /// Codec family prefix (e.g., "avc" matches avc1.xxxx)
    pub codec: Option<String>,
    /// Container the video stream must already be in
    pub container: Option<String>,
}

impl VideoConstraint {
    /// Unconstrained: best available video stream
    pub fn any() -> Self {
        Self {
            max_height: None,
            codec: None,
            container: None,
        }
    }
}

/// One entry in the fallback chain
#[derive(Debug, Clone, PartialEq)]
pub enum FormatExpr {
    /// Separate video and audio streams, merged by the collaborator.
    /// Audio is always "best available"; only the video half is constrained.
    Split(VideoConstraint),
    /// A single pre-muxed stream carrying both tracks. Covers sources that
    /// offer no separable audio/video.
    Premuxed,
}

impl fmt::Display for FormatExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatExpr::Split(video) => {
                write!(f, "bestvideo")?;
                if let Some(height) = video.max_height {
                    write!(f, "[height<={}]", height)?;
                }
                if let Some(container) = &video.container {
                    write!(f, "[ext={}]", container)?;
                }
                if let Some(codec) = &video.codec {
                    write!(f, "[vcodec~={}]", codec)?;
                }
                write!(f, "+bestaudio")
            }
            FormatExpr::Premuxed => write!(f, "best"),
        }
    }
}

/// Ordered fallback chain of format expressions
#[derive(Debug, Clone, PartialEq)]
pub struct FormatQuery {
    exprs: Vec<FormatExpr>,
}

impl FormatQuery {
    /// Expressions in evaluation order, most specific first
    pub fn exprs(&self) -> &[FormatExpr] {
        &self.exprs
    }
}

impl fmt::Display for FormatQuery {
    /// Render the chain in the collaborator's slash-separated fallback syntax
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.exprs.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", rendered.join("/"))
    }
}

/// Build the fallback chain for a request, most specific first:
///
/// 1. height cap + codec family + container, with best audio (only when both
///    a cap and a codec preference are set)
/// 2. height cap alone, with best audio
/// 3. unconstrained best video + best audio
/// 4. best pre-muxed single stream
///
/// A height cap is a ceiling, not a floor: a source whose tallest stream is
/// below the cap still matches rule 1 or 2.
pub fn build_format_query(request: &MediaRequest) -> FormatQuery {
    let mut exprs = Vec::new();

    if let Some(height) = request.max_height {
        if let Some(codec) = &request.preferred_video_codec {
            exprs.push(FormatExpr::Split(VideoConstraint {
                max_height: Some(height),
                codec: Some(codec.clone()),
                container: Some(request.preferred_container.clone()),
            }));
        }
        exprs.push(FormatExpr::Split(VideoConstraint {
            max_height: Some(height),
            codec: None,
            container: None,
        }));
    }

    exprs.push(FormatExpr::Split(VideoConstraint::any()));
    exprs.push(FormatExpr::Premuxed);

    FormatQuery { exprs }
}
