//! RAR 1.5 - 4.x block layout: constants, definitions, and low-level parsing.
//!
//! A volume is a sequence of self-delimiting blocks. Every block starts with
//! the same 7-byte prefix (all integers little-endian):
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 2 | header CRC |
//! | 2 | 1 | block type |
//! | 3 | 2 | flags |
//! | 5 | 2 | header size |
//! | 7 | 4 | data size (only if `flags & 0x8000`) |
//!
//! The first block of every volume is the marker block, whose 7 bytes double
//! as the file signature.

pub mod detect;
pub mod files;
pub mod header;
pub mod parser;
pub mod reader;

/// The RAR 1.5 - 4.x file signature (magic bytes).
///
/// These are the 7 bytes of the marker block: `"Rar!" 0x1A 0x07 0x00`.
pub const SIGNATURE: &[u8; 7] = &[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00];

/// Size of the fixed block header prefix in bytes.
pub const BASE_HEADER_SIZE: u16 = 7;

/// Size of the fixed part of a file header, following the block prefix.
pub const FILE_HEADER_FIXED_SIZE: u16 = 21;

/// Type code of the first block type; every other code is relative to it.
pub const BLOCK_TYPE_BASE: u8 = 0x72;

/// Flags shared by all block types.
pub mod block_flags {
    /// Older unrar versions skip this block when they do not understand it.
    pub const SKIP_IF_UNKNOWN: u16 = 0x4000;
    /// A 32-bit data size follows the header prefix.
    pub const LONG_BLOCK: u16 = 0x8000;
}

/// Flags of the archive (main) block.
pub mod archive_flags {
    /// The archive is split into volumes.
    pub const VOLUME: u16 = 0x0001;
    /// An archive comment is present.
    pub const COMMENT: u16 = 0x0002;
    /// The archive is locked against modification.
    pub const LOCK: u16 = 0x0004;
    /// Solid archive.
    pub const SOLID: u16 = 0x0008;
    /// Volumes use the `name.partN.rar` naming scheme.
    pub const NEW_NUMBERING: u16 = 0x0010;
    /// Authenticity information is present.
    pub const AUTHENTICITY: u16 = 0x0020;
    /// A recovery record is present.
    pub const PROTECT: u16 = 0x0040;
    /// Block headers are encrypted.
    pub const PASSWORD: u16 = 0x0080;
    /// This is the first volume of the set.
    pub const FIRST_VOLUME: u16 = 0x0100;
}

/// Flags of the file block.
pub mod file_flags {
    /// Content continues from the previous volume.
    pub const SPLIT_BEFORE: u16 = 0x0001;
    /// Content continues in the next volume.
    pub const SPLIT_AFTER: u16 = 0x0002;
    /// Content is encrypted.
    pub const PASSWORD: u16 = 0x0004;
    /// A file comment is present.
    pub const COMMENT: u16 = 0x0008;
    /// Solid flag (uses data of previous files).
    pub const SOLID: u16 = 0x0010;
    /// Mask of the dictionary size bits.
    pub const DICTIONARY_MASK: u16 = 0x00E0;
    /// High 32 bits of both sizes follow the fixed header.
    pub const LARGE: u16 = 0x0100;
    /// The name holds an 8-bit name, a NUL byte, and an encoded Unicode name.
    pub const UNICODE: u16 = 0x0200;
    /// An 8-byte salt follows the name.
    pub const SALT: u16 = 0x0400;
    /// Old file version.
    pub const VERSION: u16 = 0x0800;
    /// Extended time fields follow the name.
    pub const EXT_TIME: u16 = 0x1000;
}

/// Flags of the end-of-archive block.
pub mod end_flags {
    /// Another volume follows this one.
    pub const NEXT_VOLUME: u16 = 0x0001;
    /// A CRC-32 of the archive data follows the header prefix.
    pub const DATA_CRC: u16 = 0x0002;
    /// Reserved for future use.
    pub const REV_SPACE: u16 = 0x0004;
    /// A 16-bit volume number follows (after the data CRC, if any).
    pub const VOLUME_NUMBER: u16 = 0x0008;
}

/// Compression method bytes used in file headers.
pub mod method {
    /// Stored without compression.
    pub const STORE: u8 = 0x30;
    /// Fastest compression.
    pub const FASTEST: u8 = 0x31;
    /// Fast compression.
    pub const FAST: u8 = 0x32;
    /// Normal compression.
    pub const NORMAL: u8 = 0x33;
    /// Good compression.
    pub const GOOD: u8 = 0x34;
    /// Best compression.
    pub const BEST: u8 = 0x35;

    /// Returns a human-readable name for a method byte.
    pub fn name(method: u8) -> &'static str {
        match method {
            STORE => "store",
            FASTEST => "fastest",
            FAST => "fast",
            NORMAL => "normal",
            GOOD => "good",
            BEST => "best",
            _ => "unknown",
        }
    }
}
