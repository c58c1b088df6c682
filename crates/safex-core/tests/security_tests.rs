//! Attack-archive regression tests.
//!
//! Each test feeds a hostile entry list through a full extraction and checks
//! both the returned fault and that nothing appeared outside the root.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use safex_core::ErrorHandlerChoice;
use safex_core::ExtractionConfig;
use safex_core::ExtractionError;
use safex_core::SymlinkRejection;
use safex_core::extract;
use safex_core::formats::MemorySource;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A root nested inside a scratch directory, so escapes are observable.
fn sandbox() -> (TempDir, PathBuf) {
    let outer = TempDir::new().unwrap();
    let root = outer.path().join("root");
    (outer, root)
}

fn escaped(outer: &TempDir) -> Vec<String> {
    fs::read_dir(outer.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != "root")
        .collect()
}

#[test]
fn test_tarfile_style_traversal_names() {
    let malicious = [
        "../etc/passwd",
        "../../etc/passwd",
        "foo/../../etc/passwd",
        "foo/../../../etc/passwd",
        "..\\..\\windows\\evil.dll",
        "foo\\..\\..\\evil.txt",
        "./../evil.txt",
    ];

    for name in malicious {
        let (outer, root) = sandbox();
        let mut source = MemorySource::new().with_file(name, "pwned");

        let err = extract(&mut source, &root, &ExtractionConfig::default()).unwrap_err();

        assert!(
            matches!(err, ExtractionError::PathTraversal { .. }),
            "{name} should be rejected, got {err:?}"
        );
        assert!(escaped(&outer).is_empty(), "{name} escaped");
    }
}

#[test]
fn test_absolute_names_are_rooted() {
    let (outer, root) = sandbox();
    let mut source = MemorySource::new()
        .with_file("/etc/passwd", "rooted")
        .with_file("\\\\server\\share\\file.txt", "unc");

    extract(&mut source, &root, &ExtractionConfig::default()).unwrap();

    assert_eq!(fs::read_to_string(root.join("etc/passwd")).unwrap(), "rooted");
    assert!(root.join("server/share/file.txt").is_file());
    assert!(escaped(&outer).is_empty());
}

#[test]
fn test_null_byte_and_blank_names() {
    for name in ["evil.txt\0.jpg", "", "   ", "/", "\\ / \\"] {
        let (_outer, root) = sandbox();
        let mut source = MemorySource::new().with_file(name, "x");

        let err = extract(&mut source, &root, &ExtractionConfig::default()).unwrap_err();
        assert!(
            matches!(err, ExtractionError::InvalidEntryName { .. }),
            "{name:?} should be an invalid name, got {err:?}"
        );
    }
}

#[test]
fn test_symlink_parent_traversal() {
    let (outer, root) = sandbox();
    let mut source = MemorySource::new()
        .with_symlink("a/b/link", "../../../outside")
        .with_file("a/b/link/payload", "x");
    let config = ExtractionConfig::default().with_error_handler(|_, _| ErrorHandlerChoice::Skip);

    let report = extract(&mut source, &root, &config).unwrap();

    assert_eq!(report.symlinks_created, 0);
    assert_eq!(report.files_extracted, 1);
    assert!(root.join("a/b/link/payload").is_file());
    assert!(escaped(&outer).is_empty());
}

#[test]
fn test_symlink_to_root_is_allowed() {
    let (_outer, root) = sandbox();
    let mut source = MemorySource::new().with_symlink("a/up", "..");

    let result = extract(&mut source, &root, &ExtractionConfig::default());

    #[cfg(unix)]
    {
        assert_eq!(result.unwrap().symlinks_created, 1);
        assert_eq!(fs::read_link(root.join("a/up")).unwrap(), PathBuf::from(".."));
    }
    #[cfg(not(unix))]
    assert!(matches!(result, Err(ExtractionError::Io(_))));
}

#[test]
fn test_rejections_are_reported_per_entry() {
    let (_outer, root) = sandbox();
    let config = ExtractionConfig::default().with_error_handler(|_, _| ErrorHandlerChoice::Skip);
    let mut source = MemorySource::new()
        .with_symlink("empty", "")
        .with_symlink("abs", "/etc/shadow")
        .with_symlink("up", "../x");

    let report = extract(&mut source, &root, &config).unwrap();

    assert_eq!(report.faults_skipped, 3);
    let reasons = [
        SymlinkRejection::EmptyTarget,
        SymlinkRejection::AbsolutePathDisallowed,
        SymlinkRejection::EscapesOutputDirectory,
    ];
    for (warning, reason) in report.warnings.iter().zip(reasons) {
        assert!(warning.contains(&reason.to_string()), "{warning}");
    }
}
