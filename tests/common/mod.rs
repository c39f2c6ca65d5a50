//! Shared test utilities for integration tests.
//!
//! Builds RAR 1.5 - 4.x volumes byte by byte so the tests do not depend on
//! reference archives.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rarstore::format::{SIGNATURE, archive_flags, block_flags, end_flags, file_flags};
use tempfile::TempDir;

/// Packed DOS time for 2023-06-15 12:30:44.
pub const SAMPLE_TIME: u32 = (43 << 25) | (6 << 21) | (15 << 16) | (12 << 11) | (30 << 5) | 22;

/// Host OS byte for Unix.
pub const OS_UNIX: u8 = 3;

/// Host OS byte for Windows.
pub const OS_WIN32: u8 = 2;

/// Dictionary bits for a 4 MiB dictionary, the usual setting for files.
pub const DICTIONARY_4M: u16 = 0x00C0;

/// Encodes one block: prefix, optional data size, header body and payload.
///
/// The header CRC is left at zero; the reader does not check it.
pub fn block(type_code: u8, flags: u16, body: &[u8], data: &[u8]) -> Vec<u8> {
    let long = !data.is_empty() || flags & block_flags::LONG_BLOCK != 0;
    let flags = if long {
        flags | block_flags::LONG_BLOCK
    } else {
        flags
    };
    let header_size = 7 + if long { 4 } else { 0 } + body.len() as u16;

    let mut out = vec![0x00, 0x00, type_code];
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&header_size.to_le_bytes());
    if long {
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    }
    out.extend_from_slice(body);
    out.extend_from_slice(data);
    out
}

/// A file block under construction.
#[derive(Debug, Clone)]
pub struct FileBlock {
    pub name: Vec<u8>,
    pub data: Vec<u8>,
    pub flags: u16,
    pub crc: u32,
    pub unpacked_size: u64,
    pub method: u8,
    pub os: u8,
    pub time: u32,
    pub attributes: u32,
    pub large: bool,
}

impl FileBlock {
    /// A stored, unsplit file whose CRC and size match `data`.
    pub fn new(name: impl AsRef<[u8]>, data: &[u8]) -> Self {
        Self {
            name: name.as_ref().to_vec(),
            data: data.to_vec(),
            flags: DICTIONARY_4M,
            crc: crc32fast::hash(data),
            unpacked_size: data.len() as u64,
            method: 0x30,
            os: OS_UNIX,
            time: SAMPLE_TIME,
            attributes: 0o100644,
            large: false,
        }
    }

    /// A directory entry as archivers write it: no content, all dictionary
    /// bits set and a Unix directory mode.
    pub fn directory(name: impl AsRef<[u8]>) -> Self {
        let mut block = Self::new(name, b"");
        block.flags = file_flags::DICTIONARY_MASK;
        block.attributes = 0o40755;
        block
    }

    /// Replaces the dictionary bits.
    pub fn dictionary(mut self, bits: u16) -> Self {
        self.flags = (self.flags & !file_flags::DICTIONARY_MASK) | bits;
        self
    }

    pub fn attributes(mut self, attributes: u32) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags |= flags;
        self
    }

    pub fn crc(mut self, crc: u32) -> Self {
        self.crc = crc;
        self
    }

    pub fn unpacked_size(mut self, size: u64) -> Self {
        self.unpacked_size = size;
        self
    }

    pub fn method(mut self, method: u8) -> Self {
        self.method = method;
        self
    }

    pub fn os(mut self, os: u8) -> Self {
        self.os = os;
        self
    }

    pub fn time(mut self, time: u32) -> Self {
        self.time = time;
        self
    }

    /// Adds the high size words.
    pub fn large(mut self) -> Self {
        self.large = true;
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&(self.unpacked_size as u32).to_le_bytes());
        body.push(self.os);
        body.extend_from_slice(&self.crc.to_le_bytes());
        body.extend_from_slice(&self.time.to_le_bytes());
        body.push(29);
        body.push(self.method);
        body.extend_from_slice(&(self.name.len() as u16).to_le_bytes());
        body.extend_from_slice(&self.attributes.to_le_bytes());

        let mut flags = self.flags | block_flags::LONG_BLOCK;
        if self.large {
            flags |= file_flags::LARGE;
            body.extend_from_slice(&((self.data.len() as u64 >> 32) as u32).to_le_bytes());
            body.extend_from_slice(&((self.unpacked_size >> 32) as u32).to_le_bytes());
        }
        body.extend_from_slice(&self.name);

        block(0x74, flags, &body, &self.data)
    }
}

/// Builds one volume: marker, archive block, content blocks, end block.
#[derive(Debug, Clone, Default)]
pub struct VolumeBuilder {
    archive_flags: u16,
    blocks: Vec<Vec<u8>>,
    end_flags: u16,
    end_block: bool,
}

impl VolumeBuilder {
    pub fn new() -> Self {
        Self {
            end_block: true,
            ..Self::default()
        }
    }

    pub fn archive_flags(mut self, flags: u16) -> Self {
        self.archive_flags = flags;
        self
    }

    pub fn file(self, name: impl AsRef<[u8]>, data: &[u8]) -> Self {
        self.entry(FileBlock::new(name, data))
    }

    pub fn entry(mut self, file: FileBlock) -> Self {
        self.blocks.push(file.encode());
        self
    }

    pub fn raw(mut self, bytes: Vec<u8>) -> Self {
        self.blocks.push(bytes);
        self
    }

    pub fn end_flags(mut self, flags: u16) -> Self {
        self.end_flags = flags;
        self
    }

    /// Leaves out the end block.
    pub fn without_end(mut self) -> Self {
        self.end_block = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = SIGNATURE.to_vec();
        out.extend(block(0x73, self.archive_flags, &[0; 6], &[]));
        for b in &self.blocks {
            out.extend_from_slice(b);
        }
        if self.end_block {
            out.extend(block(0x7B, self.end_flags, &[], &[]));
        }
        out
    }
}

/// Creates a single-volume archive holding stored files.
pub fn simple_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    entries
        .iter()
        .fold(VolumeBuilder::new(), |v, (name, data)| v.file(name, data))
        .build()
}

/// Splits `data` into `count` parts with the continuation flags and CRCs
/// an archiver writes: every non-last part carries the CRC of its own bytes,
/// the last part the CRC of the whole file.
pub fn split_file(name: &str, data: &[u8], count: usize) -> Vec<FileBlock> {
    let chunk = data.len().div_ceil(count).max(1);
    let whole_crc = crc32fast::hash(data);
    (0..count)
        .map(|index| {
            let start = (index * chunk).min(data.len());
            let end = ((index + 1) * chunk).min(data.len());
            let mut part = FileBlock::new(name, &data[start..end]).unpacked_size(data.len() as u64);
            if index > 0 {
                part = part.flags(file_flags::SPLIT_BEFORE);
            }
            if index + 1 < count {
                part = part.flags(file_flags::SPLIT_AFTER);
            } else {
                part = part.crc(whole_crc);
            }
            part
        })
        .collect()
}

/// Wraps the per-volume blocks in volume builders with the archive and end
/// flags of a volume set.
pub fn volume_set(parts: Vec<Vec<FileBlock>>, new_numbering: bool) -> Vec<VolumeBuilder> {
    let count = parts.len();
    parts
        .into_iter()
        .enumerate()
        .map(|(index, blocks)| {
            let mut flags = archive_flags::VOLUME;
            if new_numbering {
                flags |= archive_flags::NEW_NUMBERING;
            }
            if index == 0 {
                flags |= archive_flags::FIRST_VOLUME;
            }
            let end = if index + 1 < count {
                end_flags::NEXT_VOLUME
            } else {
                0
            };
            blocks
                .into_iter()
                .fold(VolumeBuilder::new().archive_flags(flags), VolumeBuilder::entry)
                .end_flags(end)
        })
        .collect()
}

/// Writes each volume to `dir` under the given file names and returns the
/// path of the first one.
pub fn write_volumes(dir: &Path, names: &[&str], volumes: &[VolumeBuilder]) -> PathBuf {
    assert_eq!(names.len(), volumes.len());
    for (name, volume) in names.iter().zip(volumes) {
        std::fs::write(dir.join(name), volume.build()).expect("Failed to write volume");
    }
    dir.join(names[0])
}

/// Writes a single-volume archive to a fresh temp dir.
pub fn write_archive(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::write(&path, bytes).expect("Failed to write archive");
    (temp_dir, path)
}

/// Deterministic test content of the given length.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}
