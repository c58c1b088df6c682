//! ZIP entry source.

use std::io;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Seek;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::ExtractionError;
use crate::Result;
use crate::types::Entry;
use crate::types::EntryKind;

use super::EntrySource;

/// Entry source over a borrowed `zip::ZipArchive`.
///
/// Members are visited in central-directory order. Unlike TAR, every call
/// to [`content`](EntrySource::content) reopens the member from its start,
/// so a retried file is rewritten in full.
///
/// Symlinks are recognized from the Unix mode stored in the external
/// attributes; their target is the member's content.
///
/// # Examples
///
/// ```no_run
/// use safex_core::ExtractionConfig;
/// use safex_core::extract;
/// use safex_core::formats::ZipSource;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("archive.zip")?;
/// let mut archive = zip::ZipArchive::new(file)?;
/// let report = extract(&mut ZipSource::new(&mut archive), "/tmp/output", &ExtractionConfig::default())?;
/// println!("{} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub struct ZipSource<'a, R: Read + Seek> {
    archive: &'a mut ZipArchive<R>,
    next_index: usize,
    current: Option<usize>,
}

impl<'a, R: Read + Seek> ZipSource<'a, R> {
    /// Creates a source positioned before the first member.
    #[must_use]
    pub fn new(archive: &'a mut ZipArchive<R>) -> Self {
        Self {
            archive,
            next_index: 0,
            current: None,
        }
    }
}

impl<R: Read + Seek> ZipSource<'_, R> {
    /// Reads a symlink member's target from its content.
    fn read_link_target(&mut self, index: usize) -> Result<String> {
        let mut file = self
            .archive
            .by_index(index)
            .map_err(|e| invalid_archive(index, &e))?;
        let mut target = Vec::new();
        file.read_to_end(&mut target).map_err(|e| {
            ExtractionError::InvalidArchive(format!(
                "failed to read ZIP symlink target {index}: {e}"
            ))
        })?;
        Ok(String::from_utf8_lossy(&target).into_owned())
    }
}

fn invalid_archive(index: usize, err: &ZipError) -> ExtractionError {
    ExtractionError::InvalidArchive(format!("failed to read ZIP member {index}: {err}"))
}

/// A member whose data cannot be decoded is a fault of that entry only.
fn undecodable_member(index: usize, err: &ZipError) -> ExtractionError {
    let kind = match err {
        ZipError::UnsupportedArchive(_) => ErrorKind::Unsupported,
        _ => ErrorKind::InvalidData,
    };
    ExtractionError::Io(io::Error::new(
        kind,
        format!("cannot decode ZIP member {index}: {err}"),
    ))
}

impl<R: Read + Seek> EntrySource for ZipSource<'_, R> {
    fn next_entry(&mut self) -> Result<Option<Entry>> {
        self.current = None;
        if self.next_index >= self.archive.len() {
            return Ok(None);
        }

        let index = self.next_index;
        self.next_index += 1;

        // Raw access reads the metadata without building a decompressor, so
        // a member with an unsupported method still yields its descriptor.
        let file = self
            .archive
            .by_index_raw(index)
            .map_err(|e| invalid_archive(index, &e))?;

        let name = file.name().to_string();
        let mode = file.unix_mode();
        let size = file.size();
        let is_symlink = file.is_symlink();
        let is_dir = file.is_dir();
        drop(file);

        let kind = if is_symlink {
            EntryKind::Symlink {
                target: self.read_link_target(index)?,
            }
        } else if is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        self.current = Some(index);
        Ok(Some(Entry {
            name,
            kind,
            mode,
            size: Some(size),
        }))
    }

    fn content(&mut self) -> Result<Box<dyn Read + '_>> {
        let index = self
            .current
            .ok_or_else(|| ExtractionError::InvalidArchive("no current ZIP member".into()))?;
        let file = self
            .archive
            .by_index(index)
            .map_err(|e| undecodable_member(index, &e))?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;
    use std::io::Cursor;

    fn archive(data: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(data)).expect("valid zip")
    }

    #[test]
    fn test_maps_member_types() {
        let mut zip = archive(
            ZipTestBuilder::new()
                .add_directory("dir/")
                .add_file_with_mode("dir/run.sh", b"#!/bin/sh", 0o755)
                .add_symlink("dir/link", "run.sh")
                .build(),
        );
        let mut source = ZipSource::new(&mut zip);

        let dir = source.next_entry().unwrap().unwrap();
        assert!(dir.kind.is_directory());

        let file = source.next_entry().unwrap().unwrap();
        assert_eq!(file.name, "dir/run.sh");
        assert_eq!(file.mode.map(|m| m & 0o777), Some(0o755));
        assert_eq!(file.size, Some(9));

        let link = source.next_entry().unwrap().unwrap();
        assert_eq!(link.kind.link_target(), Some("run.sh"));

        assert!(source.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_content_restarts_for_retry() {
        let mut zip = archive(ZipTestBuilder::new().add_deflated_file("a.txt", b"abcdef").build());
        let mut source = ZipSource::new(&mut zip);
        source.next_entry().unwrap();

        let mut partial = [0u8; 3];
        source.content().unwrap().read_exact(&mut partial).unwrap();
        assert_eq!(&partial, b"abc");

        let mut full = String::new();
        source.content().unwrap().read_to_string(&mut full).unwrap();
        assert_eq!(full, "abcdef");
    }

    #[test]
    fn test_undecodable_member_is_entry_fault() {
        let mut data = ZipTestBuilder::new()
            .add_file("ok.txt", b"fine")
            .add_file("bad.bin", b"opaque")
            .add_file("later.txt", b"later")
            .build();
        // 12 is bzip2, which this build cannot decode.
        crate::test_utils::patch_zip_method(&mut data, "bad.bin", 12);
        let mut zip = archive(data);
        let mut source = ZipSource::new(&mut zip);

        source.next_entry().unwrap();
        let bad = source.next_entry().unwrap().unwrap();
        assert_eq!(bad.name, "bad.bin");
        assert_eq!(bad.kind, EntryKind::File);

        let err = source.content().err().expect("member should not decode");
        assert!(err.is_entry_fault());
        assert!(matches!(err, ExtractionError::Io(ref e) if e.kind() == ErrorKind::Unsupported));

        let later = source.next_entry().unwrap().unwrap();
        assert_eq!(later.name, "later.txt");
    }

    #[test]
    fn test_content_before_first_entry_fails() {
        let mut zip = archive(ZipTestBuilder::new().add_file("a.txt", b"a").build());
        let mut source = ZipSource::new(&mut zip);
        assert!(matches!(
            source.content(),
            Err(ExtractionError::InvalidArchive(_))
        ));
    }
}
