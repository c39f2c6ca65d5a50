//! Archive entry type.

use std::ops::Range;
use std::time::SystemTime;

use crate::format::file_flags;
use crate::format::files::{FileHeader, HostOs, directory_attribute};
use crate::timestamp::DosDateTime;

/// One file block of the archive, as listed by [`Archive::entries`].
///
/// A file split across volumes appears once per volume it occupies; all of
/// its parts share the same name.
///
/// This struct is marked `#[non_exhaustive]` to allow adding new fields
/// in future versions without breaking downstream code.
///
/// [`Archive::entries`]: super::Archive::entries
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Entry {
    /// The name exactly as stored in the archive.
    ///
    /// Names carry no guaranteed encoding. When
    /// [`has_unicode_name`](Self::has_unicode_name) is set the bytes hold an
    /// 8-bit name, a NUL byte, and an encoded Unicode name.
    pub name: Vec<u8>,
    /// Size of the whole file once extracted.
    pub unpacked_size: u64,
    /// Number of content bytes stored in this part.
    pub packed_size: u64,
    /// Operating system the entry was archived on.
    pub host_os: HostOs,
    /// CRC-32 as stored.
    ///
    /// For a part that continues in the next volume this covers the part
    /// only; otherwise it covers the whole file.
    pub crc32: u32,
    /// Modification time, in the archiving host's local time.
    pub modified: DosDateTime,
    /// Format version needed to extract.
    pub version: u8,
    /// Host-specific attribute bits.
    pub attributes: u32,
    /// Raw file block flags.
    pub flags: u16,
    /// Index of the owning volume in the chain (0 for the first volume).
    pub volume_index: usize,
    /// Offset of the first content byte within the owning volume.
    pub data_offset: u64,
}

impl Entry {
    pub(crate) fn from_header(header: &FileHeader, volume_index: usize) -> Self {
        Self {
            name: header.name.clone(),
            unpacked_size: header.unpacked_size,
            packed_size: header.packed_size,
            host_os: header.host_os,
            crc32: header.file_crc,
            modified: header.modified,
            version: header.version,
            attributes: header.attributes,
            flags: header.block.flags,
            volume_index,
            data_offset: header.header_ending(),
        }
    }

    /// Returns the name for display: the 8-bit part of a dual name, decoded
    /// lossily as UTF-8.
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(self.display_bytes()).into_owned()
    }

    /// Returns the name as `&str` if it is valid UTF-8.
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.display_bytes()).ok()
    }

    fn display_bytes(&self) -> &[u8] {
        if self.has_unicode_name() {
            self.name.split(|&b| b == 0).next().unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    /// Content continues from the previous volume.
    pub fn continued_from_previous(&self) -> bool {
        self.flags & file_flags::SPLIT_BEFORE != 0
    }

    /// Content continues in the next volume.
    pub fn continues_in_next(&self) -> bool {
        self.flags & file_flags::SPLIT_AFTER != 0
    }

    /// Returns true if this part is a piece of a file split across volumes.
    pub fn is_split(&self) -> bool {
        self.continued_from_previous() || self.continues_in_next()
    }

    /// Heuristic directory flag: true when the dictionary bits are clear.
    ///
    /// Stored files may also have these bits clear, so a zero-sized file
    /// can be reported as a directory. See
    /// [`FileHeader::is_directory`](crate::format::files::FileHeader::is_directory).
    pub fn is_directory(&self) -> bool {
        self.flags & file_flags::DICTIONARY_MASK == 0
    }

    /// Returns true if the attributes mark a directory on the host OS the
    /// entry was archived on.
    ///
    /// This is the test extraction uses. Mac OS entries, whose attributes
    /// have no known layout, count as directories when the dictionary bits
    /// are all set.
    pub fn has_directory_attribute(&self) -> bool {
        directory_attribute(self.host_os, self.attributes, self.flags)
    }

    /// Content is encrypted and cannot be read.
    pub fn is_encrypted(&self) -> bool {
        self.flags & file_flags::PASSWORD != 0
    }

    /// The name holds both an 8-bit and an encoded Unicode form.
    pub fn has_unicode_name(&self) -> bool {
        self.flags & file_flags::UNICODE != 0
    }

    /// Byte range of this part's content within its volume.
    pub fn data_range(&self) -> Range<u64> {
        self.data_offset..self.data_offset.saturating_add(self.packed_size)
    }

    /// Modification time as `SystemTime`, treating the stored value as UTC.
    ///
    /// Returns `None` if the stored date is not a valid calendar date.
    pub fn modified_time(&self) -> Option<SystemTime> {
        self.modified.as_system_time()
    }
}
