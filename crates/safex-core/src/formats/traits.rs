//! Codec collaborator interface.

use std::io::Read;

use crate::Result;
use crate::types::Entry;

/// A decoded archive, consumed one entry at a time.
///
/// Implementations are thin adapters over a codec (tar, zip, an in-memory
/// list). They own no format logic of their own beyond mapping the codec's
/// member types onto [`Entry`].
///
/// # Contract
///
/// - `next_entry` advances to the next member; `Ok(None)` signals the end.
///   Any error here is a codec fault and ends the extraction.
/// - `content` returns the bytes of the member most recently returned by
///   `next_entry`. It may be called more than once for the same member when
///   the error handler asks for a retry. Adapters over seekable codecs
///   restart from the beginning. Streaming ones fail with an entry fault
///   (`ExtractionError::Io`) once part of the member has been read.
/// - A member the codec cannot decode (unsupported method, encryption) is an
///   entry fault raised by `content`, not a codec fault: `next_entry` only
///   fails when the container itself cannot be walked.
pub trait EntrySource {
    /// Advances to the next entry.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidArchive` if the codec cannot decode
    /// the next member.
    fn next_entry(&mut self) -> Result<Option<Entry>>;

    /// Opens the content of the current entry.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no current entry or the codec cannot
    /// open it.
    fn content(&mut self) -> Result<Box<dyn Read + '_>>;
}

impl<S: EntrySource + ?Sized> EntrySource for &mut S {
    fn next_entry(&mut self) -> Result<Option<Entry>> {
        (**self).next_entry()
    }

    fn content(&mut self) -> Result<Box<dyn Read + '_>> {
        (**self).content()
    }
}

impl<S: EntrySource + ?Sized> EntrySource for Box<S> {
    fn next_entry(&mut self) -> Result<Option<Entry>> {
        (**self).next_entry()
    }

    fn content(&mut self) -> Result<Box<dyn Read + '_>> {
        (**self).content()
    }
}
