//! Extraction configuration.

use std::fmt;
use std::path::Path;

use crate::ErrorHandlerChoice;
use crate::ExtractionError;
use crate::Result;
use crate::types::Entry;

/// Predicate deciding whether an entry is extracted.
pub type EntryFilter = Box<dyn Fn(&Entry) -> bool + Send + Sync>;

/// Callback deciding how to continue after an entry fault.
pub type ErrorHandler = Box<dyn Fn(&Entry, &ExtractionError) -> ErrorHandlerChoice + Send + Sync>;

/// Callback invoked with the materialized path after each extracted entry.
pub type PostProcessor = Box<dyn Fn(&Entry, &Path) -> Result<()> + Send + Sync>;

/// How symlink targets that could leave the extraction root are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EscapingSymlinkPolicy {
    /// Create every link exactly as stored in the archive.
    Allow,
    /// Reject absolute targets and relative targets resolving outside the
    /// root.
    #[default]
    Disallow,
    /// Rewrite absolute targets relative to the link's directory; keep
    /// relative targets as they are.
    RelativizeAbsolute,
}

/// Extraction configuration with secure defaults.
///
/// The configuration is assembled once and borrowed by
/// [`extract`](crate::extract) for the whole run, so it cannot change while
/// entries are being materialized.
///
/// # Examples
///
/// ```
/// use safex_core::ErrorHandlerChoice;
/// use safex_core::EscapingSymlinkPolicy;
/// use safex_core::ExtractionConfig;
///
/// // Use secure defaults
/// let config = ExtractionConfig::default();
/// assert!(!config.overwrite);
///
/// // Customize for specific needs
/// let custom = ExtractionConfig::default()
///     .with_overwrite(true)
///     .with_strip_components(1)
///     .with_escaping_symlink_policy(EscapingSymlinkPolicy::RelativizeAbsolute)
///     .with_entry_filter(|entry| !entry.name.ends_with(".tmp"))
///     .with_error_handler(|_entry, _err| ErrorHandlerChoice::Skip);
/// ```
pub struct ExtractionConfig {
    /// Replace existing files and links.
    ///
    /// Default: `false` (existing objects are left untouched and the entry
    /// is skipped).
    pub overwrite: bool,

    /// Number of leading path segments dropped from every entry name.
    ///
    /// Default: `0`.
    pub strip_components: usize,

    /// Policy for symlink targets.
    ///
    /// Default: [`EscapingSymlinkPolicy::Disallow`].
    pub escaping_symlink_policy: EscapingSymlinkPolicy,

    entry_filter: Option<EntryFilter>,
    error_handler: Option<ErrorHandler>,
    post_processor: Option<PostProcessor>,
}

impl Default for ExtractionConfig {
    /// Creates an `ExtractionConfig` with secure default settings.
    ///
    /// Default values:
    /// - `overwrite`: false
    /// - `strip_components`: 0
    /// - `escaping_symlink_policy`: `Disallow`
    /// - entry filter: none (accept all)
    /// - error handler: none (every fault bails out)
    /// - post processor: none
    fn default() -> Self {
        Self {
            overwrite: false,
            strip_components: 0,
            escaping_symlink_policy: EscapingSymlinkPolicy::Disallow,
            entry_filter: None,
            error_handler: None,
            post_processor: None,
        }
    }
}

impl ExtractionConfig {
    /// Sets whether existing files and links are replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the number of leading path segments to drop.
    #[must_use]
    pub fn with_strip_components(mut self, count: usize) -> Self {
        self.strip_components = count;
        self
    }

    /// Sets the escaping-symlink policy.
    #[must_use]
    pub fn with_escaping_symlink_policy(mut self, policy: EscapingSymlinkPolicy) -> Self {
        self.escaping_symlink_policy = policy;
        self
    }

    /// Sets the entry filter. Rejected entries are skipped silently.
    #[must_use]
    pub fn with_entry_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Entry) -> bool + Send + Sync + 'static,
    {
        self.entry_filter = Some(Box::new(filter));
        self
    }

    /// Sets the error handler consulted for every entry fault.
    ///
    /// A handler that keeps returning [`ErrorHandlerChoice::Retry`] for a
    /// persistent fault loops forever; bounding retries is up to the handler.
    #[must_use]
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Entry, &ExtractionError) -> ErrorHandlerChoice + Send + Sync + 'static,
    {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Sets a post processor that receives the materialized path.
    #[must_use]
    pub fn with_post_processor<F>(self, processor: F) -> Self
    where
        F: Fn(&Path) -> Result<()> + Send + Sync + 'static,
    {
        self.with_entry_post_processor(move |_entry, path| processor(path))
    }

    /// Sets a post processor that receives the entry and its materialized
    /// path.
    #[must_use]
    pub fn with_entry_post_processor<F>(mut self, processor: F) -> Self
    where
        F: Fn(&Entry, &Path) -> Result<()> + Send + Sync + 'static,
    {
        self.post_processor = Some(Box::new(processor));
        self
    }

    /// Returns `true` if the entry passes the filter (or no filter is set).
    #[must_use]
    pub fn accepts(&self, entry: &Entry) -> bool {
        self.entry_filter.as_ref().is_none_or(|filter| filter(entry))
    }

    /// Asks the error handler how to continue after `err`.
    ///
    /// Without a handler every fault bails out.
    #[must_use]
    pub fn handle_error(&self, entry: &Entry, err: &ExtractionError) -> ErrorHandlerChoice {
        self.error_handler
            .as_ref()
            .map_or(ErrorHandlerChoice::BailOut, |handler| handler(entry, err))
    }

    /// Runs the post processor, if any.
    ///
    /// # Errors
    ///
    /// Returns whatever the post processor returns.
    pub fn post_process(&self, entry: &Entry, path: &Path) -> Result<()> {
        match &self.post_processor {
            Some(processor) => processor(entry, path),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("overwrite", &self.overwrite)
            .field("strip_components", &self.strip_components)
            .field("escaping_symlink_policy", &self.escaping_symlink_policy)
            .field("entry_filter", &self.entry_filter.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .field("post_processor", &self.post_processor.is_some())
            .finish()
    }
}
