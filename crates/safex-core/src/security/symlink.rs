//! Symlink escape policy enforcement.

use crate::EscapingSymlinkPolicy;
use crate::Result;
use crate::types::DestDir;
use crate::types::SafePath;
use crate::types::SafeSymlink;

/// Validates a symlink target against the configured escaping-symlink
/// policy.
///
/// This function delegates to `SafeSymlink::validate()`:
/// - Blank targets are rejected under every policy
/// - `Allow` approves any other target unchanged
/// - `Disallow` rejects absolute targets and targets that lexically resolve
///   outside the root
/// - `RelativizeAbsolute` rewrites absolute targets relative to the link's
///   parent directory
///
/// # Errors
///
/// Returns `ExtractionError::InvalidSymlink` with the rejection reason.
///
/// # Examples
///
/// ```no_run
/// use safex_core::EscapingSymlinkPolicy;
/// use safex_core::security::validate_symlink;
/// use safex_core::types::DestDir;
/// use safex_core::types::SafePath;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp")?;
/// let link = SafePath::resolve("link", 0)?.expect("not skipped");
///
/// let err = validate_symlink(&link, "/etc/passwd", &dest, EscapingSymlinkPolicy::Disallow)
///     .unwrap_err();
/// assert!(err.is_security_violation());
/// # Ok(())
/// # }
/// ```
pub fn validate_symlink(
    link_path: &SafePath,
    target: &str,
    dest: &DestDir,
    policy: EscapingSymlinkPolicy,
) -> Result<SafeSymlink> {
    SafeSymlink::validate(link_path, target, dest, policy)
}
