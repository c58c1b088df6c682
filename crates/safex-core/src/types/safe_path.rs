//! Validated safe path type for archive extraction.

use crate::ExtractionError;
use crate::Result;
use crate::security::path::is_plain_component;
use crate::security::path::normalize_segments;
use crate::security::path::sanitize_entry_name;
use std::path::Path;
use std::path::PathBuf;

/// A validated path, relative to the extraction root, that is safe for
/// extraction.
///
/// `SafePath` represents an entry name that has been:
/// - Sanitized (forward slashes, no empty segments, never blank)
/// - Stripped of the configured number of leading components
/// - Lexically normalized (no `.` or `..` left)
/// - Verified to stay below the extraction root
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`SafePath::resolve`]
/// - NO `From<PathBuf>` implementation
/// - Always relative, never empty
///
/// # Examples
///
/// ```
/// use safex_core::types::SafePath;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let safe = SafePath::resolve("pkg/./src/../lib.rs", 0)?.expect("not skipped");
/// assert_eq!(safe.as_path(), Path::new("pkg/lib.rs"));
///
/// // Path traversal is rejected
/// assert!(SafePath::resolve("../etc/passwd", 0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Resolves a raw entry name into a `SafePath`.
    ///
    /// # Resolution Steps
    ///
    /// 1. Sanitize the name (see
    ///    [`sanitize_entry_name`](crate::security::path::sanitize_entry_name))
    /// 2. Drop `strip_components` leading segments
    /// 3. Lexically resolve `.` and `..`
    /// 4. Reject anything that climbs above the root
    ///
    /// Returns `Ok(None)` when nothing is left to materialize: the entry has
    /// no more segments than `strip_components`, or it normalizes to the
    /// root itself (`./`, `a/..`).
    ///
    /// # Errors
    ///
    /// - `ExtractionError::InvalidEntryName` for blank names
    /// - `ExtractionError::PathTraversal` if the normalized path leaves the
    ///   root or a segment is not a plain host path component
    pub fn resolve(name: &str, strip_components: usize) -> Result<Option<Self>> {
        let segments = sanitize_entry_name(name)?;

        if segments.len() <= strip_components {
            return Ok(None);
        }

        let remaining = segments[strip_components..].iter().map(String::as_str);
        let Some(normalized) = normalize_segments(Vec::new(), remaining) else {
            return Err(ExtractionError::PathTraversal {
                path: PathBuf::from(name),
            });
        };

        if normalized.is_empty() {
            return Ok(None);
        }

        let mut path = PathBuf::new();
        for segment in normalized {
            // On Windows `C:` would replace the whole path when pushed.
            if !is_plain_component(segment) {
                return Err(ExtractionError::PathTraversal {
                    path: PathBuf::from(name),
                });
            }
            path.push(segment);
        }

        Ok(Some(Self(path)))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns the ordered path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|segment| segment.to_str())
    }

    /// Returns the parent directory, relative to the root.
    ///
    /// A top-level entry has the empty path as its parent.
    #[must_use]
    pub fn parent(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn resolve(name: &str, strip: usize) -> SafePath {
        SafePath::resolve(name, strip)
            .expect("should be valid")
            .expect("should not be skipped")
    }

    #[test]
    fn test_safe_path_valid_relative() {
        let safe = resolve("foo/bar/baz.txt", 0);
        assert_eq!(safe.as_path(), Path::new("foo/bar/baz.txt"));
        assert_eq!(safe.segments().collect::<Vec<_>>(), vec!["foo", "bar", "baz.txt"]);
    }

    #[test]
    fn test_safe_path_reject_parent_traversal() {
        for name in ["../etc/passwd", "foo/../../etc/passwd", "a/b/../../../c", ".."] {
            let result = SafePath::resolve(name, 0);
            assert!(
                matches!(result, Err(ExtractionError::PathTraversal { .. })),
                "path should be rejected: {name}"
            );
        }
    }

    #[test]
    fn test_safe_path_inner_parent_stays_inside() {
        let safe = resolve("a/b/../c.txt", 0);
        assert_eq!(safe.as_path(), Path::new("a/c.txt"));
    }

    #[test]
    fn test_safe_path_absolute_becomes_relative() {
        let safe = resolve("/etc/passwd", 0);
        assert_eq!(safe.as_path(), Path::new("etc/passwd"));

        let safe = resolve("\\\\server\\share\\file", 0);
        assert_eq!(safe.as_path(), Path::new("server/share/file"));
    }

    #[test]
    fn test_safe_path_normalize_dot_components() {
        let safe = resolve("./foo/./bar/./baz.txt", 0);
        assert_eq!(safe.as_path(), Path::new("foo/bar/baz.txt"));
    }

    #[test]
    fn test_safe_path_blank_name() {
        for name in ["", "   ", "///"] {
            assert!(matches!(
                SafePath::resolve(name, 0),
                Err(ExtractionError::InvalidEntryName { .. })
            ));
        }
    }

    #[test]
    fn test_strip_components() {
        let safe = resolve("pkg-1.0/src/lib.rs", 1);
        assert_eq!(safe.as_path(), Path::new("src/lib.rs"));

        let safe = resolve("a/b/c/d", 2);
        assert_eq!(safe.as_path(), Path::new("c/d"));
    }

    #[test]
    fn test_strip_components_skips_shallow_entries() {
        assert_eq!(SafePath::resolve("pkg-1.0/", 1).unwrap(), None);
        assert_eq!(SafePath::resolve("a/b", 2).unwrap(), None);
        assert_eq!(SafePath::resolve("a/b", 5).unwrap(), None);
    }

    #[test]
    fn test_strip_happens_before_normalization() {
        // The stripped segment is gone before `..` is applied.
        assert!(matches!(
            SafePath::resolve("a/../x", 1),
            Err(ExtractionError::PathTraversal { .. })
        ));
    }

    #[test]
    fn test_root_itself_is_skipped() {
        assert_eq!(SafePath::resolve("./", 0).unwrap(), None);
        assert_eq!(SafePath::resolve("a/..", 0).unwrap(), None);
    }

    #[test]
    fn test_parent() {
        assert_eq!(resolve("a/b/link", 0).parent(), Path::new("a/b"));
        assert_eq!(resolve("link", 0).parent(), Path::new(""));
    }

    #[test]
    fn test_safe_path_unicode() {
        let safe = resolve("folder/📁test.txt", 0);
        assert_eq!(safe.as_path(), Path::new("folder/📁test.txt"));
        let safe = resolve("café", 0);
        assert_eq!(safe.into_path_buf(), PathBuf::from("café"));
    }
}
