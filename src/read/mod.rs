//! Archive reading API.
//!
//! [`Archive`] presents every volume of a chain as one merged listing and
//! reads stored content back, joining the parts of files split across
//! volumes.
//!
//! # Example
//!
//! ```rust,no_run
//! use rarstore::Archive;
//!
//! let mut archive = Archive::open("photos.part1.rar")?;
//!
//! for entry in archive.entries()? {
//!     println!("{}: {} bytes", entry.name_lossy(), entry.unpacked_size);
//! }
//!
//! let data = archive.read("album/cover.jpg")?;
//! archive.extract_all("output_dir")?;
//! # Ok::<(), rarstore::Error>(())
//! ```
//!
//! # Laziness
//!
//! Opening checks and scans only the given volume. The rest of the chain is
//! opened the first time a query needs the merged listing; the listing is
//! then kept for the lifetime of the archive.

mod archive_query;
mod entry;
mod extraction;
mod info;
mod metadata;
mod options;
mod path_safety;

pub use entry::Entry;
pub use info::{ArchiveInfo, ExtractResult};
pub use options::OpenOptions;

use std::path::Path;

use log::debug;

use crate::Result;
use crate::volume::VolumeChain;

/// A RAR archive opened from its first volume.
///
/// Queries that may resolve the chain or seek a volume take `&mut self`.
/// Dropping the archive closes every volume.
#[derive(Debug)]
pub struct Archive {
    pub(crate) chain: VolumeChain,
    pub(crate) options: OpenOptions,
    pub(crate) listing: Option<Vec<Entry>>,
}

impl Archive {
    /// Opens an archive with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAnArchive`](crate::Error::NotAnArchive) if the
    /// file cannot be read or lacks the RAR signature, and any block decoding
    /// error of the first volume.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, OpenOptions::default())
    }

    /// Opens an archive with custom options.
    pub fn open_with_options(path: impl AsRef<Path>, options: OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening archive {}", path.display());
        let chain = VolumeChain::open(path, options.max_volumes)?;
        Ok(Self {
            chain,
            options,
            listing: None,
        })
    }

    /// Returns true if the file at `path` starts with the RAR signature.
    pub fn is_archive(path: impl AsRef<Path>) -> bool {
        crate::format::detect::is_archive(path)
    }

    /// Returns the options the archive was opened with.
    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// Closes the archive and every volume handle.
    pub fn close(self) {
        drop(self);
    }

    /// Resolves the chain and builds the merged listing once.
    pub(crate) fn ensure_listing(&mut self) -> Result<&[Entry]> {
        if self.listing.is_none() {
            self.chain.resolve()?;
            let entries: Vec<Entry> = self
                .chain
                .iter()
                .enumerate()
                .flat_map(|(index, volume)| {
                    volume
                        .entries()
                        .iter()
                        .map(move |header| Entry::from_header(header, index))
                })
                .collect();
            debug!(
                "merged listing: {} entries from {} volumes",
                entries.len(),
                self.chain.len()
            );
            self.listing = Some(entries);
        }
        Ok(self.listing.as_deref().unwrap_or_default())
    }
}
