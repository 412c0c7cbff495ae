//! Locator validation

use crate::error::FetchmuxError;
use url::Url;

/// Validate a source locator. Empty input is reported before any
/// collaborator is invoked.
pub fn validate_locator(locator: &str) -> Result<Url, FetchmuxError> {
    let trimmed = locator.trim();
    if trimmed.is_empty() {
        return Err(FetchmuxError::InputMissing);
    }
    Url::parse(trimmed).map_err(|e| FetchmuxError::InvalidUrl(format!("{}: {}", trimmed, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_locator() {
        assert!(validate_locator("https://www.youtube.com/watch?v=dQw4w9WgXcQ").is_ok());
        assert!(validate_locator("  https://youtu.be/x  ").is_ok());

        assert!(matches!(
            validate_locator(""),
            Err(FetchmuxError::InputMissing)
        ));
        assert!(matches!(
            validate_locator("   "),
            Err(FetchmuxError::InputMissing)
        ));
        assert!(matches!(
            validate_locator("not a url"),
            Err(FetchmuxError::InvalidUrl(_))
        ));
    }
}
