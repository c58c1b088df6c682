//! TAR entry source.
//!
//! Streams a `tar::Archive` entry by entry. Compression is the caller's
//! business: wrap the reader in a decoder before building the archive.

use std::io;
use std::io::ErrorKind;
use std::io::Read;

use tar::EntryType;
use tracing::debug;

use crate::ExtractionError;
use crate::Result;
use crate::types::Entry;
use crate::types::EntryKind;

use super::EntrySource;

/// Entry source over a borrowed `tar::Archive`.
///
/// The archive stays owned by the caller. Member types other than regular
/// files, directories and symlinks (hardlinks, devices, FIFOs) are skipped.
///
/// TAR is a stream: once part of a member has been read it cannot be
/// delivered again. Reopening the content after a partial read fails with an
/// I/O error, which goes to the error handler like any other entry fault.
///
/// # Examples
///
/// ```no_run
/// use safex_core::ExtractionConfig;
/// use safex_core::extract;
/// use safex_core::formats::TarSource;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("archive.tar")?;
/// let mut archive = tar::Archive::new(file);
/// let mut source = TarSource::new(&mut archive)?;
/// let report = extract(&mut source, "/tmp/output", &ExtractionConfig::default())?;
/// println!("{} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub struct TarSource<'a, R: 'a + Read> {
    entries: tar::Entries<'a, R>,
    current: Option<tar::Entry<'a, R>>,
    consumed: u64,
}

/// Counts the bytes handed out for the current member.
struct TrackedContent<'e, 'a, R: Read> {
    entry: &'e mut tar::Entry<'a, R>,
    consumed: &'e mut u64,
}

impl<R: Read> Read for TrackedContent<'_, '_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.entry.read(buf)?;
        *self.consumed += n as u64;
        Ok(n)
    }
}

impl<'a, R: Read> TarSource<'a, R> {
    /// Starts iterating the archive's entries.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidArchive` if the archive was already
    /// partially consumed.
    pub fn new(archive: &'a mut tar::Archive<R>) -> Result<Self> {
        let entries = archive
            .entries()
            .map_err(|e| ExtractionError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;
        Ok(Self {
            entries,
            current: None,
            consumed: 0,
        })
    }
}

impl<R: Read> EntrySource for TarSource<'_, R> {
    fn next_entry(&mut self) -> Result<Option<Entry>> {
        loop {
            // Release the previous member so the stream can skip its rest.
            self.current = None;
            self.consumed = 0;

            let Some(next) = self.entries.next() else {
                return Ok(None);
            };
            let entry = next.map_err(|e| {
                ExtractionError::InvalidArchive(format!("failed to read TAR entry: {e}"))
            })?;

            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let header = entry.header();

            let kind = match header.entry_type() {
                EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse => {
                    EntryKind::File
                }
                EntryType::Directory => EntryKind::Directory,
                EntryType::Symlink => {
                    let target = entry
                        .link_name_bytes()
                        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                        .unwrap_or_default();
                    EntryKind::Symlink { target }
                }
                other => {
                    debug!(name = %name, entry_type = ?other, "unsupported TAR entry type, skipped");
                    continue;
                }
            };

            let descriptor = Entry {
                name,
                kind,
                mode: header.mode().ok(),
                size: header.size().ok(),
            };
            self.current = Some(entry);
            return Ok(Some(descriptor));
        }
    }

    fn content(&mut self) -> Result<Box<dyn Read + '_>> {
        let Some(entry) = self.current.as_mut() else {
            return Err(ExtractionError::InvalidArchive("no current TAR entry".into()));
        };
        if self.consumed > 0 {
            return Err(ExtractionError::Io(io::Error::new(
                ErrorKind::Unsupported,
                format!(
                    "TAR member cannot be re-read after {} bytes were consumed",
                    self.consumed
                ),
            )));
        }
        Ok(Box::new(TrackedContent {
            entry,
            consumed: &mut self.consumed,
        }))
    }
}
