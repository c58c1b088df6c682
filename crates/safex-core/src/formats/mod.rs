//! Entry sources over archive codecs.
//!
//! The extraction engine never decodes an archive itself. It pulls
//! [`Entry`](crate::types::Entry) descriptors and content streams from an
//! [`EntrySource`], and these adapters map a codec's members onto that
//! interface.

pub mod memory;
pub mod tar;
pub mod traits;
pub mod zip;

pub use memory::MemorySource;
pub use tar::TarSource;
pub use traits::EntrySource;
pub use zip::ZipSource;
