//! Core extraction engine.

use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ErrorHandlerChoice;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::formats::EntrySource;
use crate::types::DestDir;
use crate::types::Entry;
use crate::types::EntryKind;
use crate::types::SafePath;
use crate::types::SafeSymlink;

use super::apply::Outcome;
use super::apply::SkipReason;
use super::apply::create_directory;
use super::apply::create_symlink;
use super::apply::write_file;
use super::recovery::SessionState;

/// Drives one extraction run: pull an entry, validate it, materialize it,
/// and consult the error handler when that fails.
///
/// The engine borrows its configuration, so one configuration can serve
/// any number of runs.
///
/// # Examples
///
/// ```no_run
/// use safex_core::ExtractionConfig;
/// use safex_core::extraction::ExtractionEngine;
/// use safex_core::formats::MemorySource;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ExtractionConfig::default();
/// let mut source = MemorySource::new().with_file("hello.txt", "hi");
/// let report = ExtractionEngine::new(&config).extract(&mut source, Path::new("/tmp/out"))?;
/// assert_eq!(report.files_extracted, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExtractionEngine<'c> {
    config: &'c ExtractionConfig,
}

impl<'c> ExtractionEngine<'c> {
    /// Creates an engine for the given configuration.
    #[must_use]
    pub const fn new(config: &'c ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extracts every entry of `source` below `output_dir`.
    ///
    /// The output directory is created if missing. Entries are processed
    /// strictly in source order; nothing is rolled back when the run stops
    /// early.
    ///
    /// # Errors
    ///
    /// - Any error from `source.next_entry()` (codec faults are never
    ///   offered to the error handler)
    /// - The entry fault for which the handler chose
    ///   [`ErrorHandlerChoice::BailOut`] (the default without a handler)
    /// - Any error returned by the post processor
    /// - I/O errors creating or resolving `output_dir`
    pub fn extract<S: EntrySource + ?Sized>(
        &self,
        source: &mut S,
        output_dir: &Path,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();
        let dest = DestDir::create(output_dir)?;
        let mut report = ExtractionReport::new();
        let mut session = SessionState::default();
        let mut buffer = CopyBuffer::new();

        while let Some(entry) = source.next_entry()? {
            loop {
                let err = match self.process(source, &entry, &dest, &mut buffer) {
                    Ok(outcome) => {
                        self.record(&entry, &outcome, &mut report)?;
                        break;
                    }
                    Err(err) if !err.is_entry_fault() => return Err(err),
                    Err(err) => err,
                };

                match session.decide(|| self.config.handle_error(&entry, &err)) {
                    ErrorHandlerChoice::Retry => {
                        debug!(entry = %entry.name, error = %err, "retrying entry");
                    }
                    ErrorHandlerChoice::Skip | ErrorHandlerChoice::SkipAll => {
                        warn!(entry = %entry.name, error = %err, "skipping entry after error");
                        report.faults_skipped += 1;
                        report.add_warning(format!("{}: {err}", entry.name));
                        break;
                    }
                    ErrorHandlerChoice::Abort => {
                        warn!(entry = %entry.name, error = %err, "extraction aborted");
                        report.aborted = true;
                        report.duration = start.elapsed();
                        return Ok(report);
                    }
                    ErrorHandlerChoice::BailOut => return Err(err),
                }
            }
        }

        report.duration = start.elapsed();
        info!(
            files = report.files_extracted,
            directories = report.directories_created,
            symlinks = report.symlinks_created,
            bytes = report.bytes_written,
            skipped = report.entries_skipped,
            faults_skipped = report.faults_skipped,
            "extraction complete"
        );
        Ok(report)
    }

    /// Validates and materializes one entry.
    fn process<S: EntrySource + ?Sized>(
        &self,
        source: &mut S,
        entry: &Entry,
        dest: &DestDir,
        buffer: &mut CopyBuffer,
    ) -> Result<Outcome> {
        let Some(safe_path) = SafePath::resolve(&entry.name, self.config.strip_components)? else {
            return Ok(Outcome::Skipped(SkipReason::NoPath));
        };

        if !self.config.accepts(entry) {
            return Ok(Outcome::Skipped(SkipReason::Filtered));
        }

        match &entry.kind {
            EntryKind::Directory => create_directory(dest, &safe_path),
            EntryKind::File => write_file(
                dest,
                &safe_path,
                entry.mode,
                self.config.overwrite,
                buffer,
                || source.content(),
            ),
            EntryKind::Symlink { target } => {
                let symlink = SafeSymlink::validate(
                    &safe_path,
                    target,
                    dest,
                    self.config.escaping_symlink_policy,
                )?;
                create_symlink(dest, &symlink, self.config.overwrite)
            }
        }
    }

    /// Updates the report and runs the post processor.
    fn record(&self, entry: &Entry, outcome: &Outcome, report: &mut ExtractionReport) -> Result<()> {
        match outcome {
            Outcome::Directory(_) => report.directories_created += 1,
            Outcome::File { bytes, .. } => {
                report.files_extracted += 1;
                report.bytes_written = report.bytes_written.saturating_add(*bytes);
            }
            Outcome::Symlink(_) => report.symlinks_created += 1,
            Outcome::Skipped(reason) => {
                report.entries_skipped += 1;
                match reason {
                    SkipReason::NoPath => {
                        debug!(entry = %entry.name, "nothing left to extract after stripping, skipped");
                    }
                    SkipReason::Filtered => debug!(entry = %entry.name, "rejected by filter"),
                    SkipReason::AlreadyExists => {
                        info!(entry = %entry.name, "target exists and overwrite is off, skipped");
                    }
                }
            }
        }

        match outcome.path() {
            Some(path) => self.config.post_process(entry, path),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ExtractionError;
    use crate::formats::MemorySource;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn run(source: &mut MemorySource, config: &ExtractionConfig) -> (TempDir, Result<ExtractionReport>) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let result = ExtractionEngine::new(config).extract(source, temp.path());
        (temp, result)
    }

    #[test]
    fn test_extracts_tree() {
        let mut source = MemorySource::new()
            .with_directory("docs/")
            .with_file("docs/readme.txt", "hello")
            .with_file("top.txt", "top");
        let (temp, result) = run(&mut source, &ExtractionConfig::default());
        let report = result.unwrap();

        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.directories_created, 1);
        assert_eq!(report.bytes_written, 8);
        assert!(report.is_complete());
        assert_eq!(
            std::fs::read_to_string(temp.path().join("docs/readme.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("new/out");
        let mut source = MemorySource::new().with_file("a.txt", "a");

        ExtractionEngine::new(&ExtractionConfig::default())
            .extract(&mut source, &output)
            .unwrap();
        assert!(output.join("a.txt").is_file());
    }

    #[test]
    fn test_traversal_bails_out_by_default() {
        let mut source = MemorySource::new()
            .with_file("first.txt", "ok")
            .with_file("../escape.txt", "bad")
            .with_file("never.txt", "never");
        let (temp, result) = run(&mut source, &ExtractionConfig::default());

        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
        assert!(temp.path().join("first.txt").exists());
        assert!(!temp.path().join("never.txt").exists());
    }

    #[test]
    fn test_root_entries_are_skipped() {
        let mut source = MemorySource::new()
            .with_directory("./")
            .with_directory("a/..")
            .with_file("a.txt", "a");
        let (_temp, result) = run(&mut source, &ExtractionConfig::default());
        let report = result.unwrap();
        assert_eq!(report.entries_skipped, 2);
        assert_eq!(report.files_extracted, 1);
    }

    #[test]
    fn test_skip_all_consults_handler_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = ExtractionConfig::default().with_error_handler(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            ErrorHandlerChoice::SkipAll
        });

        let mut source = MemorySource::new()
            .with_file("../a", "x")
            .with_file("ok.txt", "ok")
            .with_file("../b", "x")
            .with_symlink("link", "/etc/passwd");
        let (temp, result) = run(&mut source, &config);
        let report = result.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.faults_skipped, 3);
        assert_eq!(report.warnings.len(), 3);
        assert!(temp.path().join("ok.txt").exists());
    }

    #[test]
    fn test_abort_returns_partial_report() {
        let config = ExtractionConfig::default().with_error_handler(|_, _| ErrorHandlerChoice::Abort);
        let mut source = MemorySource::new()
            .with_file("kept.txt", "kept")
            .with_symlink("bad", "/etc/passwd")
            .with_file("later.txt", "later");
        let (temp, result) = run(&mut source, &config);
        let report = result.unwrap();

        assert!(report.aborted);
        assert!(!report.is_complete());
        assert_eq!(report.files_extracted, 1);
        assert!(temp.path().join("kept.txt").exists());
        assert!(!temp.path().join("later.txt").exists());
    }

    #[test]
    fn test_retry_reruns_same_entry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = ExtractionConfig::default().with_error_handler(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                ErrorHandlerChoice::Retry
            } else {
                ErrorHandlerChoice::Skip
            }
        });

        let mut source = MemorySource::new().with_file(" ", "blank name");
        let (_temp, result) = run(&mut source, &config);
        let report = result.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.faults_skipped, 1);
    }

    #[test]
    fn test_filter_skips_silently() {
        let config = ExtractionConfig::default().with_entry_filter(|e| !e.name.ends_with(".tmp"));
        let mut source = MemorySource::new()
            .with_file("keep.txt", "k")
            .with_file("drop.tmp", "d");
        let (temp, result) = run(&mut source, &config);
        let report = result.unwrap();

        assert_eq!(report.entries_skipped, 1);
        assert_eq!(report.faults_skipped, 0);
        assert!(!temp.path().join("drop.tmp").exists());
    }

    #[test]
    fn test_post_processor_error_is_not_handled() {
        let handled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&handled);
        let config = ExtractionConfig::default()
            .with_error_handler(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                ErrorHandlerChoice::Skip
            })
            .with_post_processor(|_| Err(std::io::Error::other("post failed").into()));

        let mut source = MemorySource::new().with_file("a.txt", "a");
        let (_temp, result) = run(&mut source, &config);

        assert!(matches!(result, Err(ExtractionError::Io(_))));
        assert_eq!(handled.load(Ordering::SeqCst), 0);
    }
}
