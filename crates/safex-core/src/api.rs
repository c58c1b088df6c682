//! High-level public API for archive extraction.

use std::io::Read;
use std::io::Seek;
use std::path::Path;

use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Result;
use crate::extraction::ExtractionEngine;
use crate::formats::EntrySource;
use crate::formats::TarSource;
use crate::formats::ZipSource;

/// Extracts every entry of `source` into `output_dir`.
///
/// This is the main entry point. The codec is supplied by the caller as an
/// [`EntrySource`]; this function validates each entry, materializes it
/// below `output_dir` (created if missing) and applies the recovery policy
/// of `config` to entry faults.
///
/// # Errors
///
/// Returns an error if:
/// - The source cannot advance (malformed archive)
/// - An entry fault occurs and the error handler chooses `BailOut` (the
///   default when no handler is installed)
/// - The post processor fails
/// - The output directory cannot be created
///
/// Entries materialized before the error stay on disk.
///
/// # Examples
///
/// ```
/// use safex_core::ExtractionConfig;
/// use safex_core::extract;
/// use safex_core::formats::MemorySource;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let mut source = MemorySource::new()
///     .with_directory("docs/")
///     .with_file("docs/readme.txt", "hello");
///
/// let report = extract(&mut source, temp.path(), &ExtractionConfig::default())?;
/// assert_eq!(report.files_extracted, 1);
/// # Ok(())
/// # }
/// ```
pub fn extract<S, P>(source: &mut S, output_dir: P, config: &ExtractionConfig) -> Result<ExtractionReport>
where
    S: EntrySource + ?Sized,
    P: AsRef<Path>,
{
    ExtractionEngine::new(config).extract(source, output_dir.as_ref())
}

/// Extracts an uncompressed TAR stream.
///
/// Wrap `reader` in a decoder (for example `flate2::read::GzDecoder`) for
/// compressed archives.
///
/// # Errors
///
/// Same as [`extract`].
///
/// # Examples
///
/// ```no_run
/// use safex_core::ExtractionConfig;
/// use safex_core::extract_tar;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("archive.tar")?;
/// let report = extract_tar(file, "/tmp/output", &ExtractionConfig::default())?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_tar<R: Read, P: AsRef<Path>>(
    reader: R,
    output_dir: P,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    let mut archive = tar::Archive::new(reader);
    let mut source = TarSource::new(&mut archive)?;
    extract(&mut source, output_dir, config)
}

/// Extracts a ZIP archive.
///
/// # Errors
///
/// Returns `ExtractionError::InvalidArchive` if the central directory
/// cannot be read, otherwise the same as [`extract`].
///
/// # Examples
///
/// ```no_run
/// use safex_core::ExtractionConfig;
/// use safex_core::extract_zip;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("archive.zip")?;
/// let report = extract_zip(file, "/tmp/output", &ExtractionConfig::default())?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_zip<R: Read + Seek, P: AsRef<Path>>(
    reader: R,
    output_dir: P,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    let mut archive = zip::ZipArchive::new(reader)
        .map_err(|e| ExtractionError::InvalidArchive(format!("failed to open ZIP: {e}")))?;
    extract(&mut ZipSource::new(&mut archive), output_dir, config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_tar;
    use crate::test_utils::create_test_zip;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_extract_tar() {
        let temp = TempDir::new().unwrap();
        let data = create_test_tar(&[("a/b.txt", b"bee")]);

        let report = extract_tar(Cursor::new(data), temp.path(), &ExtractionConfig::default()).unwrap();
        assert_eq!(report.files_extracted, 1);
        assert_eq!(std::fs::read(temp.path().join("a/b.txt")).unwrap(), b"bee");
    }

    #[test]
    fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let data = create_test_zip(&[("a/b.txt", b"bee")]);

        let report = extract_zip(Cursor::new(data), temp.path(), &ExtractionConfig::default()).unwrap();
        assert_eq!(report.files_extracted, 1);
        assert_eq!(std::fs::read(temp.path().join("a/b.txt")).unwrap(), b"bee");
    }

    #[test]
    fn test_extract_zip_garbage_is_invalid_archive() {
        let temp = TempDir::new().unwrap();
        let result = extract_zip(
            Cursor::new(b"not a zip".to_vec()),
            temp.path(),
            &ExtractionConfig::default(),
        );
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));
    }
}
