//! Validated safe symlink type.

use crate::EscapingSymlinkPolicy;
use crate::ExtractionError;
use crate::Result;
use crate::SymlinkRejection;
use crate::security::path::is_absolute_target;
use crate::security::path::normalize_segments;
use crate::security::path::relative_path;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;
use super::SafePath;

/// A symlink whose target has been approved by an [`EscapingSymlinkPolicy`].
///
/// The approved target is what gets written into the link. Under
/// [`EscapingSymlinkPolicy::RelativizeAbsolute`] it may differ from the raw
/// target stored in the archive.
///
/// # Examples
///
/// ```no_run
/// use safex_core::EscapingSymlinkPolicy;
/// use safex_core::types::DestDir;
/// use safex_core::types::SafePath;
/// use safex_core::types::SafeSymlink;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/out")?;
/// let link = SafePath::resolve("dir/link", 0)?.expect("not skipped");
///
/// let symlink =
///     SafeSymlink::validate(&link, "../file.txt", &dest, EscapingSymlinkPolicy::Disallow)?;
/// assert_eq!(symlink.target_path().to_str(), Some("../file.txt"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeSymlink {
    link_path: PathBuf,
    target_path: PathBuf,
}

impl SafeSymlink {
    /// Validates a symlink target and constructs a `SafeSymlink`.
    ///
    /// # Validation Steps
    ///
    /// 1. Reject blank targets, whatever the policy
    /// 2. `Allow`: approve the target as given
    /// 3. `Disallow`: reject absolute targets, then lexically resolve the
    ///    target against the link's parent and reject it if it leaves the
    ///    root
    /// 4. `RelativizeAbsolute`: rewrite absolute targets relative to the
    ///    link's parent directory; approve relative targets as given
    ///
    /// Resolution never touches the filesystem, so links already on disk
    /// are not followed.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidSymlink` with the matching
    /// [`SymlinkRejection`].
    pub fn validate(
        link: &SafePath,
        target: &str,
        dest: &DestDir,
        policy: EscapingSymlinkPolicy,
    ) -> Result<Self> {
        let reject = |reason| ExtractionError::InvalidSymlink {
            path: link.as_path().to_path_buf(),
            reason,
        };

        if target.trim().is_empty() {
            return Err(reject(SymlinkRejection::EmptyTarget));
        }

        let target_path = match policy {
            EscapingSymlinkPolicy::Allow => PathBuf::from(target),

            EscapingSymlinkPolicy::Disallow => {
                if is_absolute_target(target) {
                    return Err(reject(SymlinkRejection::AbsolutePathDisallowed));
                }
                if !resolves_inside(link, target) {
                    return Err(reject(SymlinkRejection::EscapesOutputDirectory));
                }
                PathBuf::from(target)
            }

            EscapingSymlinkPolicy::RelativizeAbsolute => {
                if is_absolute_target(target) {
                    let link_parent = dest.join_path(link.parent());
                    relative_path(&link_parent, Path::new(target))
                        .ok_or_else(|| reject(SymlinkRejection::AbsolutePathDisallowed))?
                } else {
                    PathBuf::from(target)
                }
            }
        };

        Ok(Self {
            link_path: link.as_path().to_path_buf(),
            target_path,
        })
    }

    /// Returns the link path, relative to the extraction root.
    #[inline]
    #[must_use]
    pub fn link_path(&self) -> &Path {
        &self.link_path
    }

    /// Returns the approved target, exactly as it will be stored in the link.
    #[inline]
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

/// Lexically resolves a relative `target` against the link's parent and
/// checks that the result stays at or below the root.
fn resolves_inside(link: &SafePath, target: &str) -> bool {
    let parent: Vec<&str> = link.parent().iter().filter_map(|s| s.to_str()).collect();
    normalize_segments(parent, target.split(['/', '\\'])).is_some()
}
