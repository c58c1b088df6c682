//! Materialization of validated entries on the filesystem.
//!
//! Every function here receives an already validated [`SafePath`], so the
//! host path it touches is always the root joined with a contained
//! relative path.

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::warn;

use crate::ExtractionError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::security::apply_mode;
use crate::types::DestDir;
use crate::types::SafePath;
use crate::types::SafeSymlink;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Why an entry was passed over without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    /// The name stripped or normalized to nothing.
    NoPath,
    /// The entry filter rejected the entry.
    Filtered,
    /// Something already exists at the path and overwrite is off.
    AlreadyExists,
}

/// Result of materializing one entry.
#[derive(Debug)]
pub(crate) enum Outcome {
    Directory(PathBuf),
    File { path: PathBuf, bytes: u64 },
    Symlink(PathBuf),
    Skipped(SkipReason),
}

impl Outcome {
    /// Host path of the materialized object, if one was written.
    pub(crate) fn path(&self) -> Option<&Path> {
        match self {
            Self::Directory(path) | Self::File { path, .. } | Self::Symlink(path) => Some(path),
            Self::Skipped(_) => None,
        }
    }
}

/// Creates a directory and any missing parents.
///
/// Existing directories are accepted as they are; their attributes are left
/// untouched.
pub(crate) fn create_directory(dest: &DestDir, safe_path: &SafePath) -> Result<Outcome> {
    let dir_path = dest.join(safe_path);

    match fs::metadata(&dir_path) {
        Ok(meta) if !meta.is_dir() => {
            return Err(ExtractionError::NotADirectory {
                path: safe_path.as_path().to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    fs::create_dir_all(&dir_path)?;
    Ok(Outcome::Directory(dir_path))
}

/// Writes a regular file from the stream returned by `open`.
///
/// `open` is only called once the entry is known to be written, so a skipped
/// entry never touches the codec's content stream. A copy that fails partway
/// removes what it wrote, so a later attempt never finds a truncated file.
pub(crate) fn write_file<'r, F>(
    dest: &DestDir,
    safe_path: &SafePath,
    mode: Option<u32>,
    overwrite: bool,
    buffer: &mut CopyBuffer,
    open: F,
) -> Result<Outcome>
where
    F: FnOnce() -> Result<Box<dyn Read + 'r>>,
{
    let output_path = dest.join(safe_path);

    if let Some(existing) = existing_metadata(&output_path)? {
        if !overwrite {
            return Ok(Outcome::Skipped(SkipReason::AlreadyExists));
        }
        // Unlinking rather than truncating: a symlink must not be followed
        // and a read-only file cannot be reopened for writing.
        if !existing.is_dir() {
            fs::remove_file(&output_path)?;
        }
    }

    create_parent(&output_path)?;

    let mut content = open()?;
    let output_file = File::create(&output_path)?;
    let bytes = match copy_into(&mut content, output_file, buffer) {
        Ok(bytes) => bytes,
        Err(err) => {
            if let Err(e) = fs::remove_file(&output_path) {
                warn!(path = %output_path.display(), error = %e, "failed to remove partial file");
            }
            return Err(err);
        }
    };

    if let Some(mode) = mode {
        apply_mode(&output_path, mode);
    }

    Ok(Outcome::File {
        path: output_path,
        bytes,
    })
}

fn copy_into(content: &mut dyn Read, file: File, buffer: &mut CopyBuffer) -> Result<u64> {
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let bytes = copy_with_buffer(content, &mut writer, buffer)?;
    writer.flush()?;
    Ok(bytes)
}

/// Creates an approved symlink, replacing whatever is at the path when
/// `overwrite` is set.
pub(crate) fn create_symlink(
    dest: &DestDir,
    symlink: &SafeSymlink,
    overwrite: bool,
) -> Result<Outcome> {
    let link_path = dest.join_path(symlink.link_path());

    if let Some(existing) = existing_metadata(&link_path)? {
        if !overwrite {
            return Ok(Outcome::Skipped(SkipReason::AlreadyExists));
        }
        if existing.is_dir() {
            fs::remove_dir_all(&link_path)?;
        } else {
            fs::remove_file(&link_path)?;
        }
    }

    create_parent(&link_path)?;
    make_symlink(symlink.target_path(), &link_path)?;
    Ok(Outcome::Symlink(link_path))
}

#[cfg(unix)]
fn make_symlink(target: &Path, link_path: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link_path)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_symlink(_target: &Path, _link_path: &Path) -> Result<()> {
    Err(std::io::Error::new(
        ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    )
    .into())
}

/// Metadata of whatever is at `path` without following a final symlink.
fn existing_metadata(path: &Path) -> Result<Option<fs::Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
