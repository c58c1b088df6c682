//! In-memory entry source.

use std::collections::VecDeque;
use std::io::Cursor;
use std::io::Read;

use crate::ExtractionError;
use crate::Result;
use crate::types::Entry;

/// Entry source backed by a list of entries and their contents.
///
/// Useful for synthetic archives and tests. Content is served from the
/// start on every call, so a retried file is rewritten in full.
///
/// # Examples
///
/// ```
/// use safex_core::formats::MemorySource;
/// use safex_core::types::Entry;
///
/// let source = MemorySource::new()
///     .with_directory("docs")
///     .with_file("docs/readme.txt", b"hello".to_vec())
///     .with_entry(Entry::symlink("latest", "docs/readme.txt"), Vec::new());
/// assert_eq!(source.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pending: VecDeque<(Entry, Vec<u8>)>,
    current: Option<Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry with its content.
    #[must_use]
    pub fn with_entry(mut self, entry: Entry, content: Vec<u8>) -> Self {
        self.push(entry, content);
        self
    }

    /// Appends a regular file entry.
    #[must_use]
    pub fn with_file(self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        let entry = Entry::file(name).with_size(content.len() as u64);
        self.with_entry(entry, content)
    }

    /// Appends a directory entry.
    #[must_use]
    pub fn with_directory(self, name: impl Into<String>) -> Self {
        self.with_entry(Entry::directory(name), Vec::new())
    }

    /// Appends a symlink entry.
    #[must_use]
    pub fn with_symlink(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.with_entry(Entry::symlink(name, target), Vec::new())
    }

    /// Appends an entry with its content.
    pub fn push(&mut self, entry: Entry, content: Vec<u8>) {
        self.pending.push_back((entry, content));
    }

    /// Number of entries not yet consumed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if every entry has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl super::EntrySource for MemorySource {
    fn next_entry(&mut self) -> Result<Option<Entry>> {
        Ok(self.pending.pop_front().map(|(entry, content)| {
            self.current = Some(content);
            entry
        }))
    }

    fn content(&mut self) -> Result<Box<dyn Read + '_>> {
        let data = self
            .current
            .as_deref()
            .ok_or_else(|| ExtractionError::InvalidArchive("no current entry".into()))?;
        Ok(Box::new(Cursor::new(data)))
    }
}
