//! Single-volume listing and reading tests.

use rarstore::format::{archive_flags, file_flags};
use rarstore::{Archive, Error, HostOs};

mod common;

use common::{FileBlock, VolumeBuilder};

// =============================================================================
// Listing
// =============================================================================

#[test]
fn test_list_entries() {
    let bytes = common::simple_archive(&[
        ("file1.txt", b"content1"),
        ("file2.txt", b"second file"),
        ("subdir/file3.txt", b""),
    ]);
    let (_dir, path) = common::write_archive("test.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    let entries = archive.entries().unwrap();
    assert_eq!(entries.len(), 3);

    let names: Vec<String> = entries.iter().map(|e| e.name_lossy()).collect();
    assert_eq!(names, ["file1.txt", "file2.txt", "subdir/file3.txt"]);

    let first = &entries[0];
    assert_eq!(first.unpacked_size, 8);
    assert_eq!(first.packed_size, 8);
    assert_eq!(first.host_os, HostOs::Unix);
    assert_eq!(first.crc32, crc32fast::hash(b"content1"));
    assert_eq!(first.volume_index, 0);
    assert!(!first.is_directory());
    assert!(!first.is_split());
    assert_eq!(first.modified.year, 2023);
    assert_eq!(first.modified.month, 6);
    assert_eq!(first.modified.day, 15);
    assert_eq!(first.modified.second, 44);
}

#[test]
fn test_empty_archive() {
    let bytes = VolumeBuilder::new().build();
    let (_dir, path) = common::write_archive("empty.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    assert!(archive.is_empty().unwrap());
    assert_eq!(archive.len().unwrap(), 0);
    assert!(archive.names().unwrap().is_empty());
    assert_eq!(archive.volume_count().unwrap(), 1);
}

#[test]
fn test_names_are_distinct_in_first_seen_order() {
    let bytes = VolumeBuilder::new()
        .file("b.txt", b"1")
        .file("a.txt", b"2")
        .file("b.txt", b"3")
        .build();
    let (_dir, path) = common::write_archive("dup.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    let names = archive.names().unwrap();
    assert_eq!(names, [b"b.txt".as_slice(), b"a.txt".as_slice()]);
}

#[test]
fn test_entry_lookup() {
    let bytes = common::simple_archive(&[("docs/readme.md", b"# hi")]);
    let (_dir, path) = common::write_archive("test.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    let entry = archive.entry("docs/readme.md").unwrap().unwrap();
    assert_eq!(entry.unpacked_size, 4);
    assert!(archive.entry("missing").unwrap().is_none());
}

#[test]
fn test_size_of_entry() {
    let bytes = common::simple_archive(&[("a.bin", &[0u8; 300])]);
    let (_dir, path) = common::write_archive("test.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    assert_eq!(archive.size("a.bin").unwrap(), 300);

    let err = archive.size("b.bin").unwrap_err();
    assert!(matches!(err, Error::EntryNotFound { ref name } if name == "b.bin"));
}

#[test]
fn test_large_file_sizes() {
    let data = b"tail bytes";
    let file = FileBlock::new("huge.iso", data)
        .unpacked_size((5u64 << 32) + 7)
        .large();
    let bytes = VolumeBuilder::new().entry(file).build();
    let (_dir, path) = common::write_archive("large.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    let entry = archive.entry("huge.iso").unwrap().unwrap();
    assert_eq!(entry.unpacked_size, (5u64 << 32) + 7);
    assert_eq!(entry.packed_size, data.len() as u64);
    assert_eq!(archive.read("huge.iso").unwrap(), data);
}

#[test]
fn test_unicode_name_prefix() {
    let mut name = b"caf\xe9.txt".to_vec();
    name.push(0);
    name.extend_from_slice(&[0x01, 0x02, 0x03]);
    let file = FileBlock::new(&name, b"x").flags(file_flags::UNICODE);
    let bytes = VolumeBuilder::new().entry(file).build();
    let (_dir, path) = common::write_archive("uni.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    let entry = &archive.entries().unwrap()[0];
    assert!(entry.has_unicode_name());
    assert_eq!(entry.name, name);
    assert_eq!(entry.name_str(), None);
}

#[test]
fn test_skipped_blocks_do_not_shift_content() {
    let comment = common::block(0x7A, 0x4000, b"CMT", b"archive comment text");
    let bytes = VolumeBuilder::new()
        .file("before.txt", b"first")
        .raw(comment)
        .file("after.txt", b"second")
        .build();
    let (_dir, path) = common::write_archive("skip.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    assert_eq!(archive.len().unwrap(), 2);
    assert_eq!(archive.read("before.txt").unwrap(), b"first");
    assert_eq!(archive.read("after.txt").unwrap(), b"second");
}

// =============================================================================
// Reading
// =============================================================================

#[test]
fn test_read_content() {
    let payload = common::pattern(10_000);
    let bytes = common::simple_archive(&[("small.txt", b"hello"), ("data.bin", &payload)]);
    let (_dir, path) = common::write_archive("test.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    assert_eq!(archive.read("small.txt").unwrap(), b"hello");
    assert_eq!(archive.read("data.bin").unwrap(), payload);
    // Reads are repeatable
    assert_eq!(archive.read("small.txt").unwrap(), b"hello");
}

#[test]
fn test_read_to_writer() {
    let bytes = common::simple_archive(&[("a.txt", b"streamed")]);
    let (_dir, path) = common::write_archive("test.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    let mut out = Vec::new();
    let written = archive.read_to("a.txt", &mut out).unwrap();
    assert_eq!(written, 8);
    assert_eq!(out, b"streamed");
}

#[test]
fn test_read_missing_entry() {
    let bytes = common::simple_archive(&[("a.txt", b"x")]);
    let (_dir, path) = common::write_archive("test.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    let err = archive.read("nope.txt").unwrap_err();
    assert!(matches!(err, Error::EntryNotFound { .. }));
    assert_eq!(err.entry_name(), Some("nope.txt"));
}

#[test]
fn test_read_encrypted_entry_fails() {
    let file = FileBlock::new("secret.txt", b"ciphertext").flags(file_flags::PASSWORD);
    let bytes = VolumeBuilder::new().entry(file).build();
    let (_dir, path) = common::write_archive("enc.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    assert!(archive.entries().unwrap()[0].is_encrypted());
    assert!(archive.info().unwrap().has_encrypted_entries);

    let err = archive.read("secret.txt").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFeature { .. }));
    assert!(err.is_unsupported());
}

#[test]
fn test_verify_crc_single_volume() {
    let bytes = VolumeBuilder::new()
        .file("good.txt", b"valid content")
        .entry(FileBlock::new("bad.txt", b"tampered").crc(0xDEAD_BEEF))
        .build();
    let (_dir, path) = common::write_archive("crc.rar", &bytes);

    // Without verification the bytes come back as stored
    let mut archive = Archive::open(&path).unwrap();
    assert_eq!(archive.read("bad.txt").unwrap(), b"tampered");

    let options = rarstore::OpenOptions::new().verify_crc(true);
    let mut archive = Archive::open_with_options(&path, options).unwrap();
    assert_eq!(archive.read("good.txt").unwrap(), b"valid content");

    let err = archive.read("bad.txt").unwrap_err();
    match err {
        Error::CrcMismatch {
            entry,
            expected,
            actual,
        } => {
            assert_eq!(entry, "bad.txt");
            assert_eq!(expected, 0xDEAD_BEEF);
            assert_eq!(actual, crc32fast::hash(b"tampered"));
        }
        other => panic!("expected CrcMismatch, got {:?}", other),
    }
}

// =============================================================================
// Archive info
// =============================================================================

#[test]
fn test_archive_info() {
    let bytes = VolumeBuilder::new()
        .archive_flags(archive_flags::SOLID | archive_flags::LOCK | archive_flags::PROTECT)
        .file("a.txt", b"hello")
        .file("b.txt", b"world!")
        .entry(FileBlock::directory("dir"))
        .build();
    let (_dir, path) = common::write_archive("info.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    assert!(!archive.is_multivolume());

    let info = archive.info().unwrap();
    assert_eq!(info.volume_count, 1);
    assert_eq!(info.entry_count, 3);
    assert_eq!(info.file_count, 3);
    assert_eq!(info.total_size, 11);
    assert_eq!(info.packed_size, 11);
    assert!(!info.is_multivolume);
    assert!(info.is_solid);
    assert!(info.is_locked);
    assert!(info.has_recovery_record);
    assert!(!info.has_comment);
    assert!(!info.has_encrypted_entries);
}

#[test]
fn test_directory_detection() {
    let bytes = VolumeBuilder::new()
        .entry(FileBlock::directory("photos"))
        .file("photos/a.jpg", b"jpeg")
        .entry(FileBlock::new("small.txt", b"").dictionary(0))
        .build();
    let (_dir, path) = common::write_archive("dirs.rar", &bytes);

    let mut archive = Archive::open(&path).unwrap();
    let entries = archive.entries().unwrap();
    assert!(entries[0].has_directory_attribute());
    assert!(!entries[1].has_directory_attribute());
    assert!(!entries[2].has_directory_attribute());

    // The dictionary-bit heuristic only recognises the 64 KiB file
    assert!(!entries[0].is_directory());
    assert!(!entries[1].is_directory());
    assert!(entries[2].is_directory());
}

#[test]
fn test_is_archive() {
    let bytes = common::simple_archive(&[("a", b"b")]);
    let (dir, path) = common::write_archive("test.rar", &bytes);
    assert!(Archive::is_archive(&path));
    assert!(rarstore::is_archive(&path));

    let text = dir.path().join("notes.txt");
    std::fs::write(&text, b"plain text file").unwrap();
    assert!(!rarstore::is_archive(&text));
    assert!(!rarstore::is_archive(dir.path().join("missing.rar")));
}
