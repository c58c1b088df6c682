//! Type-safe wrappers for archive extraction operations.
//!
//! This module provides the entry descriptor handed over by codecs and the
//! newtypes that enforce security validation at the type level. The safe
//! types are validated upon construction and cannot be created from raw
//! types without going through validation.

pub mod dest_dir;
pub mod entry;
pub mod safe_path;
pub mod safe_symlink;

pub use dest_dir::DestDir;
pub use entry::Entry;
pub use entry::EntryKind;
pub use safe_path::SafePath;
pub use safe_symlink::SafeSymlink;
