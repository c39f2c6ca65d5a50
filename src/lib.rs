//! # rarstore
//!
//! A pure-Rust reader for the container structure of RAR 1.5 - 4.x
//! archives, including archives split across multiple volumes.
//!
//! The crate walks the block layout of each volume, lists the stored file
//! entries with their metadata, follows the volume naming conventions to
//! find every part of an archive, and reassembles the content of files that
//! were stored without compression, even when a file spans several volumes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rarstore::{Archive, Result};
//!
//! fn main() -> Result<()> {
//!     // Open the first volume; the others are found automatically
//!     let mut archive = Archive::open("backup.part1.rar")?;
//!
//!     // List entries across all volumes
//!     for entry in archive.entries()? {
//!         println!(
//!             "{:>12}  {}  {}",
//!             entry.unpacked_size,
//!             entry.modified,
//!             entry.name_lossy()
//!         );
//!     }
//!
//!     // Read one file, joining its parts
//!     let data = archive.read("docs/report.pdf")?;
//!     println!("read {} bytes", data.len());
//!
//!     // Or extract everything
//!     archive.extract_all("./output")?;
//!     Ok(())
//! }
//! ```
//!
//! ## What Is Supported
//!
//! | Feature | Status |
//! |---------|--------|
//! | Signature check and block walking | Yes |
//! | Other blocks with the skip-if-unknown flag | Skipped |
//! | Other blocks without it | [`Error::UnknownBlockType`] |
//! | 64-bit file sizes | Yes |
//! | `.partN.rar` and `.rar`/`.rNN` volume sets | Yes |
//! | Stored (uncompressed) entries | Yes |
//! | Compressed entries | No: the volume scan fails with [`Error::UnsupportedCompressionMethod`] |
//! | Encrypted entries | Listed; reading fails with [`Error::UnsupportedFeature`] |
//! | RAR 5.0 archives | No |
//!
//! The reader never produces a partial listing: the first malformed or
//! unsupported block fails the whole operation.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. See [`Error`] for the failure classes.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: decoded blocks at `trace`,
//! skipped blocks and chain resolution at `debug`, and recoverable
//! inconsistencies (such as split files whose continuation flags do not
//! match) at `warn`. No logger is installed by the library.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod error;
pub mod format;
pub mod read;
pub mod timestamp;
pub mod volume;

pub use error::{Error, Result};
pub use format::detect::is_archive;
pub use format::files::HostOs;
pub use timestamp::DosDateTime;

// Re-export reading API at crate root for convenience
pub use read::{Archive, ArchiveInfo, Entry, ExtractResult, OpenOptions};
