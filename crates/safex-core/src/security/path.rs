//! Lexical path sanitization and containment helpers.
//!
//! Everything here is pure string/segment work. Nothing touches the
//! filesystem, so symlinks already on disk are never followed.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::types::SafePath;

/// Sanitizes a raw entry name into its non-empty segments.
///
/// Backslashes become forward slashes, repeated slashes collapse, and
/// leading/trailing slashes are dropped. `.` and `..` are kept; containment
/// is checked later by [`normalize_segments`].
///
/// # Errors
///
/// Returns `ExtractionError::InvalidEntryName` if the name is blank or
/// whitespace-only after trimming, or contains a NUL byte.
///
/// # Examples
///
/// ```
/// use safex_core::security::path::sanitize_entry_name;
///
/// let segments = sanitize_entry_name("\\dir//sub\\file.txt/").unwrap();
/// assert_eq!(segments, vec!["dir", "sub", "file.txt"]);
///
/// assert!(sanitize_entry_name(" / ").is_err());
/// ```
pub fn sanitize_entry_name(name: &str) -> Result<Vec<String>> {
    if name.contains('\0') {
        return Err(ExtractionError::InvalidEntryName {
            name: name.to_string(),
        });
    }

    let segments: Vec<String> = name
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if segments.iter().all(|segment| segment.trim().is_empty()) {
        return Err(ExtractionError::InvalidEntryName {
            name: name.to_string(),
        });
    }

    Ok(segments)
}

/// Lexically applies `segments` on top of `base`.
///
/// `.` and empty segments are dropped and `..` pops the previous segment.
/// Returns `None` when a `..` would climb above the start of `base`, i.e.
/// above the extraction root.
///
/// # Examples
///
/// ```
/// use safex_core::security::path::normalize_segments;
///
/// let resolved = normalize_segments(vec!["a", "b"], ["..", "c", ".", "d"]);
/// assert_eq!(resolved, Some(vec!["a", "c", "d"]));
///
/// assert_eq!(normalize_segments(vec!["a"], ["..", ".."]), None);
/// ```
pub fn normalize_segments<'a, I>(base: Vec<&'a str>, segments: I) -> Option<Vec<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stack = base;
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            other => stack.push(other),
        }
    }
    Some(stack)
}

/// Returns `true` if the host parses `segment` as exactly one plain
/// component (no root, no drive prefix, no `.`/`..`).
pub(crate) fn is_plain_component(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Returns `true` if a link target is absolute on this host or in POSIX
/// notation.
pub(crate) fn is_absolute_target(target: &str) -> bool {
    target.starts_with('/') || target.starts_with('\\') || Path::new(target).has_root()
}

/// Computes `target` relative to `base`, lexically.
///
/// Both paths should be absolute. `..` components are resolved without
/// touching the filesystem. Returns `None` if the two paths do not share a
/// root (e.g. different drives).
///
/// # Examples
///
/// ```
/// use safex_core::security::path::relative_path;
/// use std::path::Path;
/// use std::path::PathBuf;
///
/// let rel = relative_path(Path::new("/out/a/b"), Path::new("/out/c/d.txt"));
/// assert_eq!(rel, Some(PathBuf::from("../../c/d.txt")));
/// ```
#[must_use]
pub fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    let (base_root, base_parts) = lexical_parts(base);
    let (target_root, target_parts) = lexical_parts(target);

    if base_root != target_root {
        return None;
    }

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part);
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

/// Splits a path into its root components and its lexically normalized
/// normal components.
fn lexical_parts(path: &Path) -> (Vec<Component<'_>>, Vec<Component<'_>>) {
    let mut root = Vec::new();
    let mut parts = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => root.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                parts.pop();
            }
            Component::Normal(_) => parts.push(component),
        }
    }

    (root, parts)
}

/// Resolves a raw entry name against the extraction root.
///
/// Thin entry point over [`SafePath::resolve`].
///
/// # Errors
///
/// See [`SafePath::resolve`].
pub fn validate_path(name: &str, strip_components: usize) -> Result<Option<SafePath>> {
    SafePath::resolve(name, strip_components)
}
