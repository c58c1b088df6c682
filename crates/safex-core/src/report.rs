//! Extraction run reporting.

use std::time::Duration;

/// Report of an extraction run.
///
/// Counts what was materialized and what was passed over. Entries skipped
/// on purpose (filtered, stripped to nothing, already present) are kept
/// apart from faults the error handler chose to skip.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Number of symlinks created.
    pub symlinks_created: usize,

    /// Total bytes written to regular files.
    pub bytes_written: u64,

    /// Entries passed over without a fault.
    pub entries_skipped: usize,

    /// Entries whose fault the error handler chose to skip.
    pub faults_skipped: usize,

    /// `true` when the handler stopped the run with
    /// [`Abort`](crate::ErrorHandlerChoice::Abort).
    pub aborted: bool,

    /// Wall-clock duration of the run.
    pub duration: Duration,

    /// Messages for skipped faults.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns total number of entries materialized.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created + self.symlinks_created
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns `true` if every entry was materialized or skipped on purpose.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.aborted && self.faults_skipped == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report() {
        let report = ExtractionReport::new();
        assert_eq!(report.files_extracted, 0);
        assert_eq!(report.directories_created, 0);
        assert_eq!(report.bytes_written, 0);
        assert!(!report.has_warnings());
        assert!(report.is_complete());
    }

    #[test]
    fn test_add_warning() {
        let mut report = ExtractionReport::new();
        report.add_warning("skipped a.txt".to_string());
        assert!(report.has_warnings());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_total_items() {
        let mut report = ExtractionReport::new();
        report.files_extracted = 10;
        report.directories_created = 5;
        report.symlinks_created = 2;
        report.entries_skipped = 4;
        assert_eq!(report.total_items(), 17);
    }

    #[test]
    fn test_is_complete() {
        let mut report = ExtractionReport::new();
        report.entries_skipped = 3;
        assert!(report.is_complete());

        report.faults_skipped = 1;
        assert!(!report.is_complete());

        let aborted = ExtractionReport {
            aborted: true,
            ..ExtractionReport::default()
        };
        assert!(!aborted.is_complete());
    }
}
