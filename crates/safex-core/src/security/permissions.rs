//! Mapping of archive permission bits onto host file attributes.
//!
//! Archive modes are POSIX-style integers. POSIX hosts get the permission
//! bits applied directly; hosts that only know DOS flags get the read-only
//! and hidden flags derived from them. The mapping is lossy in that
//! direction: a DOS flag set cannot be turned back into the original mode.

use std::path::Path;

use tracing::debug;
use tracing::warn;

/// Bits applied on POSIX hosts: rwx for owner/group/other plus
/// setuid/setgid/sticky.
pub const PERMISSION_BITS: u32 = 0o7777;

const OWNER_WRITE: u32 = 0o200;
const ANY_READ: u32 = 0o444;

/// DOS-style attribute flags derived from a POSIX mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DosFlags {
    /// Owner cannot write.
    pub readonly: bool,
    /// Nobody can read.
    pub hidden: bool,
}

impl DosFlags {
    /// Derives DOS flags from a POSIX mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use safex_core::security::permissions::DosFlags;
    ///
    /// assert!(DosFlags::from_mode(0o444).readonly);
    /// assert!(!DosFlags::from_mode(0o644).readonly);
    /// assert!(DosFlags::from_mode(0o200).hidden);
    /// ```
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        Self {
            readonly: mode & OWNER_WRITE == 0,
            hidden: mode & ANY_READ == 0,
        }
    }
}

/// Native attributes to apply to an extracted file.
///
/// Selected once per host: POSIX permission bits where the host has a
/// permission model, DOS flags otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileAttributes {
    /// POSIX permission bits (already masked to [`PERMISSION_BITS`]).
    Posix(u32),
    /// DOS read-only/hidden flags.
    Dos(DosFlags),
}

impl FileAttributes {
    /// Maps a mode onto POSIX permission bits.
    #[must_use]
    pub const fn posix(mode: u32) -> Self {
        Self::Posix(mode & PERMISSION_BITS)
    }

    /// Maps a mode onto DOS flags.
    #[must_use]
    pub const fn dos(mode: u32) -> Self {
        Self::Dos(DosFlags::from_mode(mode))
    }

    /// Maps a mode onto the attribute model of the current host.
    ///
    /// Returns `None` when the mode carries no permission bits at all; such
    /// a mode means "unknown" and must not wipe the file's permissions.
    #[must_use]
    pub const fn for_host(mode: u32) -> Option<Self> {
        if mode & PERMISSION_BITS == 0 {
            return None;
        }
        #[cfg(unix)]
        {
            Some(Self::posix(mode))
        }
        #[cfg(not(unix))]
        {
            Some(Self::dos(mode))
        }
    }

    /// Applies the attributes to `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error reported by the host.
    #[allow(clippy::permissions_set_readonly_false)]
    pub fn apply(self, path: &Path) -> std::io::Result<()> {
        match self {
            Self::Posix(bits) => apply_posix(path, bits),
            Self::Dos(flags) => {
                let mut permissions = std::fs::metadata(path)?.permissions();
                if permissions.readonly() != flags.readonly {
                    permissions.set_readonly(flags.readonly);
                    std::fs::set_permissions(path, permissions)?;
                }
                if flags.hidden {
                    debug!(path = %path.display(), "hidden attribute not supported, skipped");
                }
                Ok(())
            }
        }
    }
}

#[cfg(unix)]
fn apply_posix(path: &Path, bits: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(bits))
}

#[cfg(not(unix))]
fn apply_posix(path: &Path, bits: u32) -> std::io::Result<()> {
    debug!(path = %path.display(), mode = format_args!("{bits:#o}"), "POSIX permissions not supported, skipped");
    Ok(())
}

/// Applies an archive mode to an extracted file, best effort.
///
/// Never fails: a mode without permission bits is ignored, and a host that
/// refuses the change is logged and skipped.
pub fn apply_mode(path: &Path, mode: u32) {
    let Some(attributes) = FileAttributes::for_host(mode) else {
        return;
    };

    if let Err(e) = attributes.apply(path) {
        warn!(
            path = %path.display(),
            mode = format_args!("{mode:#o}"),
            error = %e,
            "failed to apply file attributes"
        );
    }
}
