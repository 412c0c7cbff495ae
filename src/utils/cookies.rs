//! Cookie-file resolution for authenticated fetches
//!
//! An unreadable cookie path is a warning, not a failure: the fetch proceeds
//! unauthenticated.

use std::fs::File;
use std::path::{Path, PathBuf};

/// Outcome of checking a user-supplied cookie path
#[derive(Debug, PartialEq, Eq)]
pub enum CookieResolution {
    /// No path was supplied
    None,
    /// The file exists and is readable; pass it to the collaborator
    Usable(PathBuf),
    /// The path does not resolve to a readable file; proceed unauthenticated
    Unreadable(PathBuf),
}

impl CookieResolution {
    /// Path to hand to the collaborator, if any
    pub fn usable_path(&self) -> Option<&Path> {
        match self {
            CookieResolution::Usable(path) => Some(path),
            _ => None,
        }
    }
}

/// Check whether the optional cookie path can actually be opened for reading
pub fn resolve_cookie_file(path: Option<&Path>) -> CookieResolution {
    match path {
        None => CookieResolution::None,
        Some(p) => match File::open(p) {
            Ok(_) => CookieResolution::Usable(p.to_path_buf()),
            Err(_) => CookieResolution::Unreadable(p.to_path_buf()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_path_supplied() {
        assert_eq!(resolve_cookie_file(None), CookieResolution::None);
    }

    #[test]
    fn test_readable_cookie_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Netscape HTTP Cookie File").unwrap();

        let resolution = resolve_cookie_file(Some(file.path()));
        assert_eq!(
            resolution,
            CookieResolution::Usable(file.path().to_path_buf())
        );
        assert_eq!(resolution.usable_path(), Some(file.path()));
    }

    #[test]
    fn test_missing_cookie_file_downgrades() {
        let path = Path::new("/nonexistent/cookies.txt");
        let resolution = resolve_cookie_file(Some(path));
        assert_eq!(
            resolution,
            CookieResolution::Unreadable(path.to_path_buf())
        );
        assert_eq!(resolution.usable_path(), None);
    }
}
