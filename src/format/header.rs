//! Block header decoding.
//!
//! Every block of a volume begins with the same prefix, described in the
//! [module documentation](super). [`BlockHeader::parse`] decodes that prefix
//! and computes where the header and the whole block end, so the scanner can
//! reposition the cursor without interpreting the block body.

use std::io::Read;

use super::reader::{read_u8, read_u16_le, read_u32_le, truncated};
use super::{BASE_HEADER_SIZE, BLOCK_TYPE_BASE, block_flags};
use crate::{Error, Result};

/// The block types of the RAR 1.5 - 4.x format.
///
/// Type codes are consecutive, starting at `0x72` for the marker block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Marker block (`0x72`); its bytes are the file signature.
    Marker,
    /// Archive (main) block (`0x73`).
    Archive,
    /// File block (`0x74`).
    File,
    /// Old-style comment block (`0x75`).
    Comment,
    /// Old-style extra information block (`0x76`).
    Extra,
    /// Old-style subblock (`0x77`).
    Sub,
    /// Old-style recovery record (`0x78`).
    Recovery,
    /// Old-style authenticity block (`0x79`).
    Sign,
    /// New-style subblock (`0x7A`).
    NewSub,
    /// End of archive block (`0x7B`).
    Eof,
    /// A type code outside the known table.
    Unknown(u8),
}

impl BlockType {
    const TABLE: [BlockType; 10] = [
        BlockType::Marker,
        BlockType::Archive,
        BlockType::File,
        BlockType::Comment,
        BlockType::Extra,
        BlockType::Sub,
        BlockType::Recovery,
        BlockType::Sign,
        BlockType::NewSub,
        BlockType::Eof,
    ];

    /// Maps a raw type byte to a block type.
    pub fn from_code(code: u8) -> Self {
        code.checked_sub(BLOCK_TYPE_BASE)
            .and_then(|index| Self::TABLE.get(index as usize).copied())
            .unwrap_or(BlockType::Unknown(code))
    }

    /// Returns the raw type byte.
    pub fn code(&self) -> u8 {
        match self {
            BlockType::Unknown(code) => *code,
            known => {
                let index = Self::TABLE
                    .iter()
                    .position(|t| t == known)
                    .unwrap_or_default();
                BLOCK_TYPE_BASE + index as u8
            }
        }
    }

    /// Returns a short lowercase name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            BlockType::Marker => "marker",
            BlockType::Archive => "archive",
            BlockType::File => "file",
            BlockType::Comment => "comment",
            BlockType::Extra => "extra",
            BlockType::Sub => "sub",
            BlockType::Recovery => "recovery",
            BlockType::Sign => "sign",
            BlockType::NewSub => "new_sub",
            BlockType::Eof => "eof",
            BlockType::Unknown(_) => "unknown",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockType::Unknown(code) => write!(f, "unknown({:#04x})", code),
            other => f.write_str(other.name()),
        }
    }
}

/// The decoded common prefix of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Header CRC as stored. Not verified.
    pub crc: u16,
    /// Block type.
    pub block_type: BlockType,
    /// Raw block flags.
    pub flags: u16,
    /// Declared size of the header, prefix included.
    pub header_size: u16,
    /// Size of the data following the header, when `LONG_BLOCK` is set.
    pub data_size: Option<u32>,
    /// Absolute offset of the first header byte within the volume.
    pub block_start: u64,
}

impl BlockHeader {
    /// Decodes a block prefix from `r`, which must be positioned at
    /// `offset`.
    ///
    /// On success the reader is left just after the prefix (7 or 11 bytes
    /// in). Callers that read more header fields must stay within
    /// [`header_ending`](Self::header_ending).
    ///
    /// # Errors
    ///
    /// - [`Error::TruncatedData`] if the stream ends inside the prefix
    /// - [`Error::UnknownBlockType`] for an unknown type code that does not
    ///   carry the skip-if-unknown flag
    /// - [`Error::CorruptHeader`] if the declared header size is smaller than
    ///   the prefix itself
    pub fn parse<R: Read>(r: &mut R, offset: u64) -> Result<Self> {
        let crc = read_u16_le(r).map_err(truncated(offset, "block header"))?;
        let type_code = read_u8(r).map_err(truncated(offset, "block header"))?;
        let flags = read_u16_le(r).map_err(truncated(offset, "block header"))?;
        let header_size = read_u16_le(r).map_err(truncated(offset, "block header"))?;
        let data_size = if flags & block_flags::LONG_BLOCK != 0 {
            Some(read_u32_le(r).map_err(truncated(offset, "block data size"))?)
        } else {
            None
        };

        let header = Self {
            crc,
            block_type: BlockType::from_code(type_code),
            flags,
            header_size,
            data_size,
            block_start: offset,
        };

        if matches!(header.block_type, BlockType::Unknown(_)) && !header.skip_if_unknown() {
            return Err(Error::UnknownBlockType {
                offset,
                type_code,
            });
        }
        header.require_header_size(header.prefix_size(), "block prefix")?;
        Ok(header)
    }

    /// Number of bytes the prefix occupies (7, or 11 with a data size).
    pub fn prefix_size(&self) -> u16 {
        if self.data_size.is_some() {
            BASE_HEADER_SIZE + 4
        } else {
            BASE_HEADER_SIZE
        }
    }

    /// Fails with [`Error::CorruptHeader`] unless the declared header size
    /// covers `needed` bytes.
    pub fn require_header_size(&self, needed: u16, what: &str) -> Result<()> {
        if self.header_size < needed {
            return Err(Error::corrupt_header(
                self.block_start,
                format!(
                    "{} block declares header size {} but its {} needs {} bytes",
                    self.block_type, self.header_size, what, needed
                ),
            ));
        }
        Ok(())
    }

    /// Returns true if readers may skip this block when they do not
    /// understand it.
    pub fn skip_if_unknown(&self) -> bool {
        self.flags & block_flags::SKIP_IF_UNKNOWN != 0
    }

    /// Returns true if the given flag bits are all set.
    pub fn has_flags(&self, mask: u16) -> bool {
        self.flags & mask == mask
    }

    /// Absolute offset just past the header.
    pub fn header_ending(&self) -> u64 {
        self.block_start + u64::from(self.header_size)
    }

    /// Absolute offset just past the block's data, using the 32-bit size.
    ///
    /// File blocks may widen their data size; see
    /// [`FileHeader::block_ending`](super::files::FileHeader::block_ending).
    pub fn block_ending(&self) -> u64 {
        self.header_ending() + u64::from(self.data_size.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prefix(type_code: u8, flags: u16, header_size: u16, data_size: Option<u32>) -> Vec<u8> {
        let mut out = vec![0x34, 0x12, type_code];
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&header_size.to_le_bytes());
        if let Some(size) = data_size {
            out.extend_from_slice(&size.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_block_type_codes() {
        assert_eq!(BlockType::from_code(0x72), BlockType::Marker);
        assert_eq!(BlockType::from_code(0x74), BlockType::File);
        assert_eq!(BlockType::from_code(0x7B), BlockType::Eof);
        assert_eq!(BlockType::from_code(0x7C), BlockType::Unknown(0x7C));
        assert_eq!(BlockType::from_code(0x10), BlockType::Unknown(0x10));
        for code in 0x72..=0x7B {
            assert_eq!(BlockType::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_marker_block() {
        let mut cur = Cursor::new(crate::format::SIGNATURE.to_vec());
        let h = BlockHeader::parse(&mut cur, 0).unwrap();
        assert_eq!(h.block_type, BlockType::Marker);
        assert_eq!(h.crc, 0x6152);
        assert_eq!(h.header_size, 7);
        assert_eq!(h.data_size, None);
        assert_eq!(h.block_ending(), 7);
    }

    #[test]
    fn test_long_block_endings() {
        let data = prefix(0x7A, 0x8000 | 0x4000, 11, Some(100));
        let h = BlockHeader::parse(&mut Cursor::new(data), 20).unwrap();
        assert_eq!(h.data_size, Some(100));
        assert_eq!(h.header_ending(), 31);
        assert_eq!(h.block_ending(), 131);
        assert!(h.skip_if_unknown());
    }

    #[test]
    fn test_unknown_type_without_skip() {
        let data = prefix(0x99, 0, 7, None);
        let err = BlockHeader::parse(&mut Cursor::new(data), 40).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownBlockType {
                offset: 40,
                type_code: 0x99
            }
        ));
    }

    #[test]
    fn test_unknown_type_with_skip() {
        let data = prefix(0x99, 0x4000, 7, None);
        let h = BlockHeader::parse(&mut Cursor::new(data), 0).unwrap();
        assert_eq!(h.block_type, BlockType::Unknown(0x99));
    }

    #[test]
    fn test_header_size_too_small() {
        let data = prefix(0x75, 0x8000, 7, Some(4));
        let err = BlockHeader::parse(&mut Cursor::new(data), 0).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader { offset: 0, .. }));

        let data = prefix(0x75, 0, 0, None);
        assert!(BlockHeader::parse(&mut Cursor::new(data), 0).is_err());
    }

    #[test]
    fn test_truncated_prefix() {
        let err = BlockHeader::parse(&mut Cursor::new(vec![0x00, 0x00, 0x74]), 9).unwrap_err();
        assert!(matches!(err, Error::TruncatedData { offset: 9, .. }));
    }
}
