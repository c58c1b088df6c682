//! Error types for archive extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Why a symlink entry was rejected by the escaping-symlink policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymlinkRejection {
    /// The link target is empty or whitespace-only.
    EmptyTarget,
    /// The link target is absolute and the policy forbids absolute targets.
    AbsolutePathDisallowed,
    /// The link target resolves outside the extraction root.
    EscapesOutputDirectory,
}

impl std::fmt::Display for SymlinkRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTarget => write!(f, "empty link target"),
            Self::AbsolutePathDisallowed => write!(f, "absolute link target not allowed"),
            Self::EscapesOutputDirectory => {
                write!(f, "link target escapes the output directory")
            }
        }
    }
}

/// Errors that can occur during archive extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The codec could not advance to the next entry (malformed framing).
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Entry name is blank after sanitization or cannot name a host file.
    #[error("invalid entry name: {name:?}")]
    InvalidEntryName {
        /// The raw entry name.
        name: String,
    },

    /// Path traversal attempt detected.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The path that attempted traversal.
        path: PathBuf,
    },

    /// Symlink target rejected by the escaping-symlink policy.
    #[error("invalid symlink {path}: {reason}")]
    InvalidSymlink {
        /// The symlink path, relative to the extraction root.
        path: PathBuf,
        /// Why the target was rejected.
        reason: SymlinkRejection,
    },

    /// A directory entry collides with an existing non-directory.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The conflicting path.
        path: PathBuf,
    },
}

impl ExtractionError {
    /// Returns `true` if this error represents a security violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use safex_core::ExtractionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::InvalidArchive("truncated header".into());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::InvalidSymlink { .. }
        )
    }

    /// Returns `true` if this error belongs to a single entry and is routed
    /// through the configured error handler.
    ///
    /// Codec faults (`InvalidArchive`) are the only class that always ends
    /// the extraction without consulting the handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use safex_core::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidEntryName { name: " ".into() };
    /// assert!(err.is_entry_fault());
    ///
    /// let err = ExtractionError::InvalidArchive("bad checksum".into());
    /// assert!(!err.is_entry_fault());
    /// ```
    #[must_use]
    pub const fn is_entry_fault(&self) -> bool {
        !matches!(self, Self::InvalidArchive(_))
    }

    /// Returns the symlink rejection reason, if applicable.
    #[must_use]
    pub const fn symlink_rejection(&self) -> Option<SymlinkRejection> {
        match self {
            Self::InvalidSymlink { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::InvalidEntryName { name } => Some(name),
            _ => None,
        }
    }
}
