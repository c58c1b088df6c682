//! Safe, resumable materialization of archive entries.
//!
//! `safex-core` turns the entries of an already decoded archive into files,
//! directories and symlinks below a target directory. It never lets an
//! entry land outside that directory:
//!
//! - entry names are normalized lexically and traversal is rejected
//! - symlink targets are checked against an escaping-symlink policy
//! - archive modes are mapped onto the host's permission model
//!
//! Faults on individual entries go to a caller-supplied error handler that
//! can retry, skip, skip everything from now on, abort, or bail out.
//!
//! # Examples
//!
//! ```no_run
//! use safex_core::ErrorHandlerChoice;
//! use safex_core::ExtractionConfig;
//! use safex_core::extract_tar;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractionConfig::default()
//!     .with_strip_components(1)
//!     .with_error_handler(|_entry, _err| ErrorHandlerChoice::Skip);
//!
//! let file = std::fs::File::open("release.tar")?;
//! let report = extract_tar(file, "/output/dir", &config)?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod report;
pub mod security;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::extract;
pub use api::extract_tar;
pub use api::extract_zip;
pub use config::EscapingSymlinkPolicy;
pub use config::ExtractionConfig;
pub use error::ExtractionError;
pub use error::Result;
pub use error::SymlinkRejection;
pub use extraction::ErrorHandlerChoice;
pub use formats::EntrySource;
pub use report::ExtractionReport;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::Entry;
pub use types::EntryKind;
pub use types::SafePath;
pub use types::SafeSymlink;
