//! Archive entry descriptor handed over by a codec.

/// Kind of an archive entry.
///
/// Codecs map their own member types onto these three kinds. Anything else
/// (hardlinks, devices, FIFOs) is the codec adapter's business and never
/// reaches the extraction engine.
///
/// # Examples
///
/// ```
/// use safex_core::types::EntryKind;
///
/// let file = EntryKind::File;
/// let link = EntryKind::Symlink {
///     target: "../shared/lib.so".to_string(),
/// };
/// assert!(file.is_file());
/// assert_eq!(link.link_target(), Some("../shared/lib.so"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Symbolic link entry.
    ///
    /// The `target` is the raw link text as stored in the archive. It has NOT
    /// been validated and may be absolute, relative, empty, or blank.
    Symlink {
        /// The raw link target.
        target: String,
    },
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a symlink.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink { .. })
    }

    /// Returns the raw link target for symlinks.
    #[must_use]
    pub fn link_target(&self) -> Option<&str> {
        match self {
            Self::Symlink { target } => Some(target),
            _ => None,
        }
    }
}

/// One archive member as described by the codec.
///
/// Entries are transient: the codec adapter produces one, the engine borrows
/// it for a single loop iteration, and it is dropped before the next entry is
/// requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Raw entry name as stored in the archive.
    pub name: String,

    /// Entry kind (with the link target for symlinks).
    pub kind: EntryKind,

    /// POSIX-style permission and type bits, when the codec carries them.
    pub mode: Option<u32>,

    /// Uncompressed size in bytes, when known.
    pub size: Option<u64>,
}

impl Entry {
    /// Creates a regular file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::File)
    }

    /// Creates a directory entry.
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::Directory)
    }

    /// Creates a symlink entry pointing at `target`.
    #[must_use]
    pub fn symlink(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            EntryKind::Symlink {
                target: target.into(),
            },
        )
    }

    fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mode: None,
            size: None,
        }
    }

    /// Sets the permission bits.
    #[must_use]
    pub const fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the uncompressed size.
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}
