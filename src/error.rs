//! Error types for RAR archive operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when reading RAR archives and their volume chains, along
//! with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Decoding
//! is fail-fast: the first malformed block aborts the scan of its volume and
//! the error reaches the caller of the operation that triggered it. No
//! partially decoded entry or half-built volume chain is ever exposed.
//!
//! ```rust,no_run
//! use rarstore::{Archive, Error};
//!
//! fn list(path: &str) -> rarstore::Result<()> {
//!     let mut archive = match Archive::open(path) {
//!         Ok(archive) => archive,
//!         Err(Error::NotAnArchive { path, reason }) => {
//!             eprintln!("{} is not a RAR archive: {}", path, reason);
//!             return Ok(());
//!         }
//!         Err(e) => return Err(e),
//!     };
//!
//!     for name in archive.names()? {
//!         println!("{}", String::from_utf8_lossy(name));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Reaching the end block of a volume is a normal termination signal of the
//! block scanner and is never reported through this type.

use std::io;

/// The main error type for RAR archive operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | File system operations |
/// | Format | [`NotAnArchive`][Self::NotAnArchive], [`UnknownBlockType`][Self::UnknownBlockType], [`CorruptHeader`][Self::CorruptHeader], [`TruncatedData`][Self::TruncatedData] | Invalid archive data |
/// | Compatibility | [`UnsupportedCompressionMethod`][Self::UnsupportedCompressionMethod], [`UnsupportedOs`][Self::UnsupportedOs], [`UnsupportedFeature`][Self::UnsupportedFeature] | Features this reader does not implement |
/// | Volumes | [`UnsupportedVolumeNaming`][Self::UnsupportedVolumeNaming], [`VolumeMissing`][Self::VolumeMissing], [`VolumeCycle`][Self::VolumeCycle] | Broken or unusual volume sets |
/// | Integrity | [`CrcMismatch`][Self::CrcMismatch], [`BrokenContinuation`][Self::BrokenContinuation] | Data corruption |
/// | Queries | [`EntryNotFound`][Self::EntryNotFound] | Caller asked for an absent name |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    ///
    /// Underlying I/O failures are passed through unchanged, except for
    /// short reads while decoding a header, which are reported as
    /// [`TruncatedData`](Self::TruncatedData).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with the RAR signature.
    #[error("Not a RAR archive: {path}: {reason}")]
    NotAnArchive {
        /// The path that failed the signature check.
        path: String,
        /// What was found instead.
        reason: String,
    },

    /// A block this reader does not interpret lacks the skip-if-unknown
    /// flag. The type code may be outside the known table or a known type
    /// such as a comment block.
    #[error("Unknown block type {type_code:#04x} at offset {offset:#x}")]
    UnknownBlockType {
        /// Offset of the block header within its volume.
        offset: u64,
        /// The raw type byte.
        type_code: u8,
    },

    /// A file entry uses a compression method other than "store".
    ///
    /// Only uncompressed entries can be read; no partial entry is produced.
    #[error("Unsupported compression method {method:#04x} ({name}) for entry '{entry}'")]
    UnsupportedCompressionMethod {
        /// The raw method byte (`0x30` is store).
        method: u8,
        /// Human-readable method name.
        name: &'static str,
        /// Name of the offending entry.
        entry: String,
    },

    /// A file entry names a host operating system outside the known table.
    #[error("Unsupported host OS {os} for entry '{entry}'")]
    UnsupportedOs {
        /// The raw OS byte.
        os: u8,
        /// Name of the offending entry.
        entry: String,
    },

    /// The archive continues in another volume but its file name does not
    /// follow a naming scheme the resolver understands.
    #[error("Unsupported volume naming: cannot derive the next volume of '{path}'")]
    UnsupportedVolumeNaming {
        /// The path of the volume whose successor was requested.
        path: String,
    },

    /// The stream ended while a header, name, or content region was being read.
    #[error("Truncated data at offset {offset:#x} while reading {context}")]
    TruncatedData {
        /// Stream offset at which the short read started.
        offset: u64,
        /// What was being decoded.
        context: &'static str,
    },

    /// A header is internally inconsistent.
    ///
    /// Raised when the declared header size is smaller than the fields the
    /// header itself requires, which would otherwise leave the scanner unable
    /// to advance.
    #[error("Corrupt header at offset {offset:#x}: {reason}")]
    CorruptHeader {
        /// Offset of the block header within its volume.
        offset: u64,
        /// A description of the corruption.
        reason: String,
    },

    /// No entry with the requested name exists anywhere in the volume chain.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// The name that was not found (lossily decoded).
        name: String,
    },

    /// A volume file is missing from a multi-volume archive.
    ///
    /// # Recovery
    ///
    /// - Ensure all volume files are present in the same directory
    /// - Check that volume files haven't been renamed
    #[error(
        "Volume {volume} missing: expected at '{path}' (multi-volume archives require all parts in the same directory)"
    )]
    VolumeMissing {
        /// The volume number (1-indexed) that is missing.
        volume: u32,
        /// The expected path of the missing volume.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The naming scheme led back to a volume that is already in the chain.
    #[error("Volume chain loops back to '{path}'")]
    VolumeCycle {
        /// The path that was about to be opened a second time.
        path: String,
    },

    /// The parts of a split entry do not link up through their
    /// continuation flags.
    ///
    /// Only raised with [`OpenOptions::strict_continuation`] enabled.
    ///
    /// [`OpenOptions::strict_continuation`]: crate::read::OpenOptions::strict_continuation
    #[error("Broken continuation for entry '{entry}' at part {part}: {reason}")]
    BrokenContinuation {
        /// Name of the split entry.
        entry: String,
        /// Index (0-based) of the offending part among the entry's parts.
        part: usize,
        /// What is inconsistent.
        reason: &'static str,
    },

    /// The CRC checksum does not match the expected value.
    ///
    /// Only raised with [`OpenOptions::verify_crc`] enabled.
    ///
    /// [`OpenOptions::verify_crc`]: crate::read::OpenOptions::verify_crc
    #[error("CRC mismatch for entry '{entry}': expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        /// The entry name with the CRC mismatch.
        entry: String,
        /// The expected CRC value from the archive.
        expected: u32,
        /// The actual CRC value of the data read.
        actual: u32,
    },

    /// A feature required by the archive is not supported.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the unsupported feature.
        feature: &'static str,
    },

    /// An entry name would escape the extraction directory.
    #[error("Path traversal detected in entry: {path}")]
    PathTraversal {
        /// The offending name.
        path: String,
    },

    /// A configured resource limit was exceeded.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),
}

impl Error {
    /// Returns `true` if this is a data corruption error.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::CorruptHeader { .. }
                | Error::TruncatedData { .. }
                | Error::UnknownBlockType { .. }
                | Error::CrcMismatch { .. }
                | Error::BrokenContinuation { .. }
        )
    }

    /// Returns `true` if this error is related to unsupported features or methods.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedCompressionMethod { .. }
                | Error::UnsupportedOs { .. }
                | Error::UnsupportedVolumeNaming { .. }
                | Error::UnsupportedFeature { .. }
        )
    }

    /// Returns `true` if this error concerns the volume chain rather than a
    /// single volume's contents.
    pub fn is_volume_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedVolumeNaming { .. }
                | Error::VolumeMissing { .. }
                | Error::VolumeCycle { .. }
        )
    }

    /// Returns the entry name associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::UnsupportedCompressionMethod { entry, .. } => Some(entry.as_str()),
            Error::UnsupportedOs { entry, .. } => Some(entry.as_str()),
            Error::EntryNotFound { name } => Some(name.as_str()),
            Error::BrokenContinuation { entry, .. } => Some(entry.as_str()),
            Error::CrcMismatch { entry, .. } => Some(entry.as_str()),
            Error::PathTraversal { path } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Creates a CorruptHeader error.
    pub fn corrupt_header(offset: u64, reason: impl Into<String>) -> Self {
        Error::CorruptHeader {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates an EntryNotFound error from a raw entry name.
    pub fn entry_not_found(name: &[u8]) -> Self {
        Error::EntryNotFound {
            name: String::from_utf8_lossy(name).into_owned(),
        }
    }
}

/// A specialized Result type for RAR operations.
pub type Result<T> = std::result::Result<T, Error>;
