//! Archive signature detection.
//!
//! This module gates every volume open: a file is only treated as a RAR
//! volume if it begins with the 7-byte marker block [`SIGNATURE`]. A few
//! neighbouring signatures are recognised as well, so that a rejection can
//! say what the file looks like instead.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::SIGNATURE;
use crate::{Error, Result};

/// Number of leading bytes needed to tell the known formats apart.
const DETECT_LEN: usize = 8;

/// Detected archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// RAR 1.5 - 4.x archive (readable by this crate).
    Rar,
    /// RAR 5.0+ archive.
    Rar5,
    /// 7z archive.
    SevenZip,
    /// ZIP archive.
    Zip,
    /// Unknown or unrecognized format.
    Unknown,
}

impl ArchiveFormat {
    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            ArchiveFormat::Rar => "RAR",
            ArchiveFormat::Rar5 => "RAR5",
            ArchiveFormat::SevenZip => "7-Zip",
            ArchiveFormat::Zip => "ZIP",
            ArchiveFormat::Unknown => "Unknown",
        }
    }

    /// Returns whether this format can be read by this crate.
    pub fn is_supported(&self) -> bool {
        matches!(self, ArchiveFormat::Rar)
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Known archive format signatures.
const SIGNATURES: &[(&[u8], ArchiveFormat)] = &[
    // RAR: 'R' 'a' 'r' '!' 0x1A 0x07 0x00
    (SIGNATURE, ArchiveFormat::Rar),
    // RAR5: 'R' 'a' 'r' '!' 0x1A 0x07 0x01 0x00
    (
        &[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x01, 0x00],
        ArchiveFormat::Rar5,
    ),
    // 7z: '7' 'z' 0xBC 0xAF 0x27 0x1C
    (
        &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C],
        ArchiveFormat::SevenZip,
    ),
    // ZIP: 'P' 'K' 0x03 0x04 (local file header)
    (&[0x50, 0x4B, 0x03, 0x04], ArchiveFormat::Zip),
];

/// Detects the archive format from the leading bytes of a file.
///
/// # Example
///
/// ```rust
/// use rarstore::format::detect::{detect_format, ArchiveFormat};
///
/// assert_eq!(detect_format(b"Rar!\x1a\x07\x00\xcf"), ArchiveFormat::Rar);
/// assert_eq!(detect_format(b"Rar!\x1a\x07\x01\x00"), ArchiveFormat::Rar5);
/// assert_eq!(detect_format(b"hello"), ArchiveFormat::Unknown);
/// ```
pub fn detect_format(header: &[u8]) -> ArchiveFormat {
    SIGNATURES
        .iter()
        .find(|(signature, _)| header.starts_with(signature))
        .map(|(_, format)| *format)
        .unwrap_or(ArchiveFormat::Unknown)
}

/// Returns true if the reader starts with the RAR signature.
///
/// Consumes up to 7 bytes from the reader. A stream shorter than the
/// signature is reported as `Ok(false)`, not as an error.
pub fn has_signature<R: Read>(reader: &mut R) -> io::Result<bool> {
    let mut head = Vec::with_capacity(SIGNATURE.len());
    reader
        .take(SIGNATURE.len() as u64)
        .read_to_end(&mut head)?;
    Ok(head.as_slice() == SIGNATURE)
}

/// Returns true if the file at `path` starts with the RAR signature.
///
/// Never fails: a missing, unreadable, or short file yields `false`.
///
/// # Example
///
/// ```rust,no_run
/// use rarstore::is_archive;
///
/// if is_archive("backup.part1.rar") {
///     println!("looks like a RAR volume");
/// }
/// ```
pub fn is_archive(path: impl AsRef<Path>) -> bool {
    File::open(path.as_ref())
        .and_then(|mut file| has_signature(&mut file))
        .unwrap_or(false)
}

/// Reads the leading bytes of `reader` and fails with
/// [`Error::NotAnArchive`] unless they carry the RAR signature.
///
/// Leaves the reader positioned after the bytes inspected; callers seek
/// back to the start before scanning.
pub(crate) fn check_signature<R: Read>(reader: &mut R, path: &Path) -> Result<()> {
    let mut head = Vec::with_capacity(DETECT_LEN);
    reader.take(DETECT_LEN as u64).read_to_end(&mut head)?;

    let reason = match detect_format(&head) {
        ArchiveFormat::Rar => return Ok(()),
        ArchiveFormat::Rar5 => "RAR 5.0 archives are not supported".to_string(),
        ArchiveFormat::Unknown if head.len() < SIGNATURE.len() => {
            format!("file is only {} bytes long", head.len())
        }
        ArchiveFormat::Unknown => "missing RAR signature".to_string(),
        other => format!("file is a {} archive", other),
    };
    Err(Error::NotAnArchive {
        path: path.display().to_string(),
        reason,
    })
}
