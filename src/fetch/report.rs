//! Per-item outcomes and batch reporting
//!
//! A failed item never aborts its siblings; the batch result carries every
//! outcome so partial failure is visible in the exit code.

/// Result of fetching one item of a batch
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    /// 1-based position within the collection
    pub index: usize,
    /// Item title as reported by the probe
    pub title: String,
    /// Failure reason, if the item failed
    pub error: Option<String>,
}

impl ItemOutcome {
    /// Record a successful item
    pub fn ok(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            error: None,
        }
    }

    /// Record a failed item with its reason
    pub fn failed(index: usize, title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            error: Some(reason.into()),
        }
    }

    /// Check if this item succeeded
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Overall status of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every item succeeded
    Complete,
    /// Some items succeeded, some failed
    CompleteWithErrors,
    /// Every item failed
    Failed,
}

impl BatchStatus {
    /// Process exit code: partial failure is distinguishable from total failure
    pub fn exit_code(&self) -> i32 {
        match self {
            BatchStatus::Complete => 0,
            BatchStatus::CompleteWithErrors => 2,
            BatchStatus::Failed => 1,
        }
    }
}

/// Aggregated result of a fetch invocation
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Collection title, when the locator addressed a collection
    pub collection_title: Option<String>,
    outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    /// Create an empty report for a single-item fetch
    pub fn new() -> Self {
        Self {
            collection_title: None,
            outcomes: Vec::new(),
        }
    }

    /// Create an empty report for a collection fetch
    pub fn for_collection(title: impl Into<String>) -> Self {
        Self {
            collection_title: Some(title.into()),
            outcomes: Vec::new(),
        }
    }

    /// Append one item's outcome
    pub fn push(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    /// All recorded outcomes, in fetch order
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    /// Number of items that succeeded
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Number of items that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Overall batch status
    pub fn status(&self) -> BatchStatus {
        match (self.succeeded(), self.failed()) {
            (_, 0) => BatchStatus::Complete,
            (0, _) => BatchStatus::Failed,
            _ => BatchStatus::CompleteWithErrors,
        }
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_items_succeed() {
        let mut report = BatchReport::for_collection("My Playlist");
        report.push(ItemOutcome::ok(1, "first"));
        report.push(ItemOutcome::ok(2, "second"));

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.status(), BatchStatus::Complete);
        assert_eq!(report.status().exit_code(), 0);
    }

    #[test]
    fn test_partial_failure_is_not_total_failure() {
        let mut report = BatchReport::for_collection("My Playlist");
        report.push(ItemOutcome::ok(1, "first"));
        report.push(ItemOutcome::failed(2, "second", "HTTP 403"));
        report.push(ItemOutcome::ok(3, "third"));

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.status(), BatchStatus::CompleteWithErrors);
        assert_eq!(report.status().exit_code(), 2);
    }

    #[test]
    fn test_every_item_failing() {
        let mut report = BatchReport::new();
        report.push(ItemOutcome::failed(1, "only", "unavailable"));

        assert_eq!(report.status(), BatchStatus::Failed);
        assert_eq!(report.status().exit_code(), 1);
    }

    #[test]
    fn test_empty_report_is_complete() {
        let report = BatchReport::new();
        assert_eq!(report.status(), BatchStatus::Complete);
    }

    #[test]
    fn test_failure_reason_is_preserved() {
        let outcome = ItemOutcome::failed(2, "second", "HTTP 403");
        assert!(!outcome.is_ok());
        assert_eq!(outcome.error.as_deref(), Some("HTTP 403"));
    }
}
