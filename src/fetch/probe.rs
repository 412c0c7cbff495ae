//! Source probing
//!
//! One `yt-dlp --flat-playlist -J` call classifies a locator as a single
//! item or a collection, without downloading any media.

use crate::error::FetchmuxError;
use serde::Deserialize;

/// One entry of a flat-playlist probe
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    pub id: Option<String>,
    pub title: Option<String>,
}

impl SourceEntry {
    /// Display title, falling back to the id
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| "(untitled)".to_string())
    }
}

/// What a locator turned out to address
#[derive(Debug, Clone)]
pub enum Source {
    /// A single media item
    Single {
        title: Option<String>,
    },
    /// A set of items behind one locator
    Collection {
        title: String,
        entries: Vec<SourceEntry>,
    },
}

impl Source {
    /// Check if the locator addressed a collection
    pub fn is_collection(&self) -> bool {
        matches!(self, Source::Collection { .. })
    }
}

#[derive(Debug, Deserialize)]
struct RawProbe {
    #[serde(rename = "_type")]
    kind: Option<String>,
    title: Option<String>,
    entries: Option<Vec<SourceEntry>>,
}

/// Classify a probe JSON document into a [`Source`]
pub fn classify_probe_output(json: &str) -> Result<Source, FetchmuxError> {
    let raw: RawProbe = serde_json::from_str(json)?;

    let is_collection = raw.kind.as_deref() == Some("playlist") || raw.entries.is_some();
    if is_collection {
        Ok(Source::Collection {
            title: raw.title.unwrap_or_else(|| "playlist".to_string()),
            entries: raw.entries.unwrap_or_default(),
        })
    } else {
        Ok(Source::Single { title: raw.title })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_single_video() {
        let json = r#"{"_type": "video", "id": "abc", "title": "A Video"}"#;
        let source = classify_probe_output(json).unwrap();

        assert!(!source.is_collection());
        match source {
            Source::Single { title } => assert_eq!(title.as_deref(), Some("A Video")),
            other => panic!("expected Single, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_playlist() {
        let json = r#"{
            "_type": "playlist",
            "title": "My Mix",
            "entries": [
                {"id": "a1", "url": "https://www.youtube.com/watch?v=a1", "title": "One"},
                {"id": "b2", "title": "Two"},
                {"id": "c3", "url": "https://www.youtube.com/watch?v=c3", "title": "Three"}
            ]
        }"#;
        let source = classify_probe_output(json).unwrap();

        match source {
            Source::Collection { title, entries } => {
                assert_eq!(title, "My Mix");
                assert_eq!(entries.len(), 3);
                assert_eq!(entries[1].display_title(), "Two");
            }
            other => panic!("expected Collection, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_untyped_document_with_entries() {
        let json = r#"{"title": "Legacy", "entries": []}"#;
        let source = classify_probe_output(json).unwrap();
        assert!(source.is_collection());
    }

    #[test]
    fn test_classify_rejects_malformed_json() {
        assert!(classify_probe_output("not json").is_err());
    }

    #[test]
    fn test_entry_display_title_fallbacks() {
        let entry = SourceEntry {
            id: Some("xyz".to_string()),
            title: None,
        };
        assert_eq!(entry.display_title(), "xyz");

        let blank = SourceEntry {
            id: None,
            title: None,
        };
        assert_eq!(blank.display_title(), "(untitled)");
    }
}
