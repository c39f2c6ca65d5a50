//! File block decoding.
//!
//! A file block describes one stored file, or one part of a file split
//! across volumes. After the common block prefix it carries:
//!
//! | Size | Field |
//! |------|-------|
//! | 4 | unpacked size (low 32 bits) |
//! | 1 | host OS |
//! | 4 | file CRC-32 |
//! | 4 | modification time (MS-DOS packed) |
//! | 1 | format version needed to extract |
//! | 1 | method (`0x30` = store) |
//! | 2 | name length |
//! | 4 | attributes |
//! | 4 + 4 | high packed size, high unpacked size (only with `LARGE`) |
//! | n | name |
//!
//! The block's data size is the packed size; the stored bytes directly follow
//! the header.

use std::io::Read;
use std::ops::Range;

use super::FILE_HEADER_FIXED_SIZE;
use super::file_flags;
use super::header::BlockHeader;
use super::method;
use super::reader::{read_bytes, read_u8, read_u16_le, read_u32_le, truncated};
use crate::timestamp::DosDateTime;
use crate::{Error, Result};

/// The operating system an entry was archived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    /// MS-DOS.
    MsDos,
    /// OS/2.
    Os2,
    /// Windows.
    Win32,
    /// Unix.
    Unix,
    /// Classic Mac OS.
    MacOs,
    /// BeOS.
    BeOs,
}

impl HostOs {
    /// Maps the raw OS byte, returning `None` outside the known table.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(HostOs::MsDos),
            1 => Some(HostOs::Os2),
            2 => Some(HostOs::Win32),
            3 => Some(HostOs::Unix),
            4 => Some(HostOs::MacOs),
            5 => Some(HostOs::BeOs),
            _ => None,
        }
    }

    /// Reads the directory bit out of host-specific attributes.
    ///
    /// DOS, OS/2 and Windows hosts set `0x10`; Unix and BeOS hosts store a
    /// `st_mode` with the `S_IFDIR` file type. Returns `None` for hosts
    /// without a known layout.
    pub fn is_directory_attribute(&self, attributes: u32) -> Option<bool> {
        match self {
            HostOs::MsDos | HostOs::Os2 | HostOs::Win32 => Some(attributes & 0x10 != 0),
            HostOs::Unix | HostOs::BeOs => Some(attributes & 0o170000 == 0o040000),
            HostOs::MacOs => None,
        }
    }

    /// Returns the raw OS byte.
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            HostOs::MsDos => "MS-DOS",
            HostOs::Os2 => "OS/2",
            HostOs::Win32 => "Windows",
            HostOs::Unix => "Unix",
            HostOs::MacOs => "Mac OS",
            HostOs::BeOs => "BeOS",
        }
    }
}

impl std::fmt::Display for HostOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded file block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// The common block prefix.
    pub block: BlockHeader,
    /// Size of the whole file once extracted.
    pub unpacked_size: u64,
    /// Number of content bytes stored in this block.
    pub packed_size: u64,
    /// Operating system the entry was archived on.
    pub host_os: HostOs,
    /// CRC-32 as stored: of this part for a part that continues in the next
    /// volume, of the whole file otherwise.
    pub file_crc: u32,
    /// Modification time.
    pub modified: DosDateTime,
    /// Format version needed to extract.
    pub version: u8,
    /// Method byte minus `0x30`; always 0 (store) for a decoded header.
    pub method: u8,
    /// Host-specific attribute bits.
    pub attributes: u32,
    /// Name exactly as stored.
    pub name: Vec<u8>,
}

impl FileHeader {
    /// Decodes the file-specific part of a block whose prefix has already
    /// been read into `block`.
    ///
    /// # Errors
    ///
    /// - [`Error::TruncatedData`] if the stream ends inside the header, or
    ///   the packed size reaches past any possible stream end
    /// - [`Error::CorruptHeader`] if the declared header size does not cover
    ///   the fields and the name
    /// - [`Error::UnsupportedCompressionMethod`] for any method but store
    /// - [`Error::UnsupportedOs`] for an OS byte outside [`HostOs`]
    pub fn decode<R: Read>(r: &mut R, block: BlockHeader) -> Result<Self> {
        let offset = block.block_start;
        let mut needed = block.prefix_size() + FILE_HEADER_FIXED_SIZE;
        block.require_header_size(needed, "fixed file fields")?;

        let fields = read_bytes(r, FILE_HEADER_FIXED_SIZE as usize)
            .map_err(truncated(offset, "file header"))?;
        let mut f = fields.as_slice();
        let low_unpacked = read_u32_le(&mut f)?;
        let os = read_u8(&mut f)?;
        let file_crc = read_u32_le(&mut f)?;
        let file_time = read_u32_le(&mut f)?;
        let version = read_u8(&mut f)?;
        let method_byte = read_u8(&mut f)?;
        let name_len = read_u16_le(&mut f)?;
        let attributes = read_u32_le(&mut f)?;

        let mut packed_size = u64::from(block.data_size.unwrap_or(0));
        let mut unpacked_size = u64::from(low_unpacked);
        if block.flags & file_flags::LARGE != 0 {
            needed += 8;
            block.require_header_size(needed, "64-bit size fields")?;
            let high_packed = read_u32_le(r).map_err(truncated(offset, "64-bit sizes"))?;
            let high_unpacked = read_u32_le(r).map_err(truncated(offset, "64-bit sizes"))?;
            packed_size += u64::from(high_packed) << 32;
            unpacked_size += u64::from(high_unpacked) << 32;
        }

        if block.header_ending().checked_add(packed_size).is_none() {
            return Err(Error::TruncatedData {
                offset,
                context: "block data",
            });
        }

        needed = needed.saturating_add(name_len);
        block.require_header_size(needed, "file name")?;
        let name = read_bytes(r, name_len as usize).map_err(truncated(offset, "file name"))?;

        let normalized = method_byte.wrapping_sub(method::STORE);
        if normalized != 0 {
            return Err(Error::UnsupportedCompressionMethod {
                method: method_byte,
                name: method::name(method_byte),
                entry: String::from_utf8_lossy(&name).into_owned(),
            });
        }
        let host_os = HostOs::from_byte(os).ok_or_else(|| Error::UnsupportedOs {
            os,
            entry: String::from_utf8_lossy(&name).into_owned(),
        })?;

        Ok(Self {
            block,
            unpacked_size,
            packed_size,
            host_os,
            file_crc,
            modified: DosDateTime::from_packed(file_time),
            version,
            method: normalized,
            attributes,
            name,
        })
    }

    /// Content continues from the previous volume.
    pub fn continued_from_previous(&self) -> bool {
        self.block.flags & file_flags::SPLIT_BEFORE != 0
    }

    /// Content continues in the next volume.
    pub fn continues_in_next(&self) -> bool {
        self.block.flags & file_flags::SPLIT_AFTER != 0
    }

    /// Returns true if the dictionary bits are all clear.
    ///
    /// This is a heuristic: archivers mark directories with the dictionary
    /// bits set to `0xE0`, and a stored file with a 64 KiB dictionary has
    /// them clear. [`has_directory_attribute`](Self::has_directory_attribute)
    /// is the reliable test.
    pub fn is_directory(&self) -> bool {
        self.block.flags & file_flags::DICTIONARY_MASK == 0
    }

    /// Returns true if the host attributes mark a directory.
    ///
    /// Hosts without a known attribute layout fall back to the dictionary
    /// bits being all set.
    pub fn has_directory_attribute(&self) -> bool {
        directory_attribute(self.host_os, self.attributes, self.block.flags)
    }

    /// Content is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.block.flags & file_flags::PASSWORD != 0
    }

    /// The name field holds an 8-bit name followed by an encoded Unicode name.
    pub fn has_unicode_name(&self) -> bool {
        self.block.flags & file_flags::UNICODE != 0
    }

    /// Absolute offset of the first content byte.
    pub fn header_ending(&self) -> u64 {
        self.block.header_ending()
    }

    /// Absolute offset just past the content, using the widened packed size.
    ///
    /// [`decode`](Self::decode) rejects sizes that would overflow, so this
    /// never saturates for a decoded header.
    pub fn block_ending(&self) -> u64 {
        self.header_ending().saturating_add(self.packed_size)
    }

    /// Byte range of the content within the owning volume.
    pub fn data_range(&self) -> Range<u64> {
        self.header_ending()..self.block_ending()
    }
}

pub(crate) fn directory_attribute(host_os: HostOs, attributes: u32, flags: u16) -> bool {
    host_os
        .is_directory_attribute(attributes)
        .unwrap_or(flags & file_flags::DICTIONARY_MASK == file_flags::DICTIONARY_MASK)
}
