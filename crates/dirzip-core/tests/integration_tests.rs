//! Integration tests for dirzip-core.
//!
//! These tests verify end-to-end builds with real filesystem operations and
//! read every archive back with the `zip` reader.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use dirzip_core::ArchiveBuilder;
use dirzip_core::ArchiveConfig;
use dirzip_core::ArchiveError;
use dirzip_core::BuildState;
use dirzip_core::EntryMethod;
use dirzip_core::ErrorKind;
use dirzip_core::build_archive;
use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        assert!(!file.is_dir(), "directories never become entries");
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        entries.insert(file.name().to_string(), content);
    }
    entries
}

fn entry_names_in_order(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_archive_contains_exactly_kept_files() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "a.txt", b"alpha");
    write_file(src.path(), "b.conf", b"bravo");
    write_file(src.path(), "sub/c.txt", b"charlie");
    write_file(src.path(), "sub/deeper/d.md", b"delta");
    write_file(src.path(), "sub/empty.txt", b"");

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");
    let config = ArchiveConfig::default().with_exclusions([".conf"]);

    let report = build_archive(src.path(), &dest, &config).unwrap();

    let entries = read_archive(&dest);
    assert_eq!(
        entries.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["a.txt", "sub/c.txt", "sub/deeper/d.md"]
    );
    assert_eq!(entries["sub/deeper/d.md"], b"delta");
    assert_eq!(report.files_added, 3);
    assert_eq!(report.files_excluded, 1);
    assert_eq!(report.files_skipped_empty, 1);
    assert_eq!(report.bytes_written, 17);
}

#[test]
fn test_entry_order_follows_walk_order() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "z.txt", b"z");
    write_file(src.path(), "m/inner.txt", b"i");
    write_file(src.path(), "a.txt", b"a");

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");
    let report = build_archive(src.path(), &dest, &ArchiveConfig::default()).unwrap();

    let names = entry_names_in_order(&dest);
    assert_eq!(names, vec!["a.txt", "m/inner.txt", "z.txt"]);
    assert_eq!(names, report.entries);
}

#[test]
fn test_entry_names_use_forward_slashes_without_root_prefix() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "one/two/three/file.bin", b"\x00\x01\x02");

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");
    build_archive(src.path(), &dest, &ArchiveConfig::default()).unwrap();

    for name in entry_names_in_order(&dest) {
        assert!(!name.starts_with('/'));
        assert!(!name.contains('\\'));
        assert!(!name.contains(&*src.path().to_string_lossy()));
    }
}

#[test]
fn test_builds_are_idempotent_in_content() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "x/y.txt", b"why");
    write_file(src.path(), "x.txt", b"ex");
    write_file(src.path(), "skip.zip", b"PK");

    let out = TempDir::new().unwrap();
    let first = out.path().join("first.zip");
    let second = out.path().join("second.zip");
    let config = ArchiveConfig::default();

    build_archive(src.path(), &first, &config).unwrap();
    build_archive(src.path(), &second, &config).unwrap();

    assert_eq!(entry_names_in_order(&first), entry_names_in_order(&second));
    assert_eq!(read_archive(&first), read_archive(&second));
}

#[test]
fn test_relative_source_root() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "site/index.html", b"<p/>");

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");

    // Joining a `.` component keeps the root unnormalized.
    let root = src.path().join(".").join("site");
    build_archive(&root, &dest, &ArchiveConfig::default()).unwrap();

    assert_eq!(entry_names_in_order(&dest), vec!["index.html"]);
}

#[test]
fn test_existing_destination_is_truncated() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "a.txt", b"alpha");

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");
    fs::write(&dest, vec![0xFFu8; 100_000]).unwrap();

    let report = build_archive(src.path(), &dest, &ArchiveConfig::default()).unwrap();

    assert_eq!(fs::metadata(&dest).unwrap().len(), report.archive_size);
    assert_eq!(read_archive(&dest).len(), 1);
}

#[test]
fn test_file_over_limit_fails_build() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "big.bin", &[7u8; 64 * 1024]);

    let out = TempDir::new().unwrap();
    let config = ArchiveConfig::default()
        .with_chunk_size(4096)
        .with_max_file_size(16 * 1024);

    let err = build_archive(src.path(), out.path().join("out.zip"), &config).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SizeLimitExceeded);
    assert!(err.path().unwrap().ends_with("big.bin"));
}

#[test]
fn test_limit_counts_the_final_empty_read() {
    // 8192 bytes with 4096-byte chunks takes three reads: two full, one EOF.
    let src = TempDir::new().unwrap();
    write_file(src.path(), "exact.bin", &[1u8; 8192]);
    let out = TempDir::new().unwrap();

    let tight = ArchiveConfig::default()
        .with_chunk_size(4096)
        .with_max_file_size(8192);
    let err = build_archive(src.path(), out.path().join("tight.zip"), &tight).unwrap_err();
    assert!(matches!(err, ArchiveError::FileTooLarge { .. }));

    let roomy = tight.with_max_file_size(3 * 4096);
    let report = build_archive(src.path(), out.path().join("roomy.zip"), &roomy).unwrap();
    assert_eq!(report.bytes_written, 8192);
}

#[test]
fn test_large_file_streams_in_chunks() {
    let src = TempDir::new().unwrap();
    let content: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    write_file(src.path(), "data/large.bin", &content);

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");
    let report = build_archive(src.path(), &dest, &ArchiveConfig::default()).unwrap();

    assert_eq!(report.bytes_written, content.len() as u64);
    assert_eq!(read_archive(&dest)["data/large.bin"], content);
}

#[test]
fn test_deflated_archive_round_trips() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "text.txt", "lorem ipsum ".repeat(2000).as_bytes());

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");
    let config = ArchiveConfig::default().with_method(EntryMethod::Deflated { level: 6 });
    let report = build_archive(src.path(), &dest, &config).unwrap();

    assert!(report.archive_size < report.bytes_written);
    let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
    assert_eq!(
        archive.by_index(0).unwrap().compression(),
        zip::CompressionMethod::Deflated
    );
}

#[test]
fn test_stored_is_default_method() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "text.txt", b"plain");

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");
    build_archive(src.path(), &dest, &ArchiveConfig::default()).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
    assert_eq!(
        archive.by_index(0).unwrap().compression(),
        zip::CompressionMethod::Stored
    );
}

#[test]
fn test_destination_directory_missing() {
    let src = TempDir::new().unwrap();
    write_file(src.path(), "a.txt", b"alpha");
    let out = TempDir::new().unwrap();

    let mut builder = ArchiveBuilder::default();
    let err = builder
        .build(src.path(), out.path().join("no/such/dir/out.zip"))
        .unwrap_err();

    assert!(matches!(err, ArchiveError::CreateDestination { .. }));
    assert_eq!(err.kind(), ErrorKind::WriteFailure);
    assert_eq!(builder.state(), BuildState::Failed);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_fails_with_open_error() {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new().unwrap();
    write_file(src.path(), "locked.txt", b"secret");
    let locked = src.path().join("locked.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits.
    if File::open(&locked).is_ok() {
        return;
    }

    let out = TempDir::new().unwrap();
    let err =
        build_archive(src.path(), out.path().join("out.zip"), &ArchiveConfig::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::OpenFailure);
    assert!(matches!(err, ArchiveError::Open { .. }));
}

#[cfg(unix)]
#[test]
fn test_permissions_are_recorded() {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new().unwrap();
    write_file(src.path(), "run.sh", b"#!/bin/sh\n");
    fs::set_permissions(src.path().join("run.sh"), fs::Permissions::from_mode(0o750)).unwrap();

    let out = TempDir::new().unwrap();
    let dest = out.path().join("out.zip");
    build_archive(src.path(), &dest, &ArchiveConfig::default()).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
    let mode = archive.by_index(0).unwrap().unix_mode().unwrap();
    assert_eq!(mode & 0o777, 0o750);
}
