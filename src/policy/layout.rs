//! Output layout selection
//!
//! Pure naming rule for where fetched files land. Collection items go into a
//! directory named after the collection with a positional index prefix; a
//! single item is saved under its own title with no nesting.

/// Deterministic naming rule for downloaded files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// `<collection title>/<index> - <title>.<ext>`
    Collection,
    /// `<title>.<ext>`
    Single,
}

impl OutputLayout {
    /// Render the layout in the collaborator's output-template syntax
    pub fn template(&self) -> &'static str {
        match self {
            OutputLayout::Collection => "%(playlist)s/%(playlist_index)s - %(title)s.%(ext)s",
            OutputLayout::Single => "%(title)s.%(ext)s",
        }
    }

    /// Check whether items are nested under a collection directory
    pub fn is_nested(&self) -> bool {
        matches!(self, OutputLayout::Collection)
    }
}

/// Pick the layout for a locator. Depends only on `is_collection`.
pub fn choose_output_layout(is_collection: bool) -> OutputLayout {
    if is_collection {
        OutputLayout::Collection
    } else {
        OutputLayout::Single
    }
}
