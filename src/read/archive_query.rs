//! Archive query methods.
//!
//! These methods answer questions about the merged listing without
//! reading any content.

use std::collections::HashSet;
use std::path::Path;

use super::{Archive, ArchiveInfo, Entry};
use crate::{Error, Result};

impl Archive {
    /// Returns every file block of every volume, in chain order.
    ///
    /// Resolves the volume chain on first use.
    pub fn entries(&mut self) -> Result<&[Entry]> {
        self.ensure_listing()
    }

    /// Returns the first entry with the given name.
    pub fn entry(&mut self, name: impl AsRef<[u8]>) -> Result<Option<&Entry>> {
        let name = name.as_ref();
        Ok(self.ensure_listing()?.iter().find(|e| e.name == name))
    }

    /// Returns the distinct entry names in order of first appearance.
    ///
    /// A file split across volumes is listed once.
    pub fn names(&mut self) -> Result<Vec<&[u8]>> {
        let listing = self.ensure_listing()?;
        let mut seen = HashSet::new();
        Ok(listing
            .iter()
            .map(|e| e.name.as_slice())
            .filter(|name| seen.insert(*name))
            .collect())
    }

    /// Returns the unpacked size of the first entry with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if no entry has that name.
    pub fn size(&mut self, name: impl AsRef<[u8]>) -> Result<u64> {
        let name = name.as_ref();
        self.entry(name)?
            .map(|e| e.unpacked_size)
            .ok_or_else(|| Error::entry_not_found(name))
    }

    /// Returns the number of file blocks across all volumes.
    pub fn len(&mut self) -> Result<usize> {
        Ok(self.ensure_listing()?.len())
    }

    /// Returns true if no volume holds a file block.
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.ensure_listing()?.is_empty())
    }

    /// Returns whether the first volume is marked as part of a volume set.
    ///
    /// Does not resolve the chain.
    pub fn is_multivolume(&self) -> bool {
        self.chain.first().scan().is_volume()
    }

    /// Returns the number of volumes in the chain.
    pub fn volume_count(&mut self) -> Result<usize> {
        self.ensure_listing()?;
        Ok(self.chain.len())
    }

    /// Returns the paths of all volumes, in chain order.
    pub fn volume_paths(&mut self) -> Result<Vec<&Path>> {
        self.ensure_listing()?;
        Ok(self.chain.iter().map(|v| v.path()).collect())
    }

    /// Returns a summary of the archive.
    pub fn info(&mut self) -> Result<ArchiveInfo> {
        self.ensure_listing()?;
        let flags = self.chain.first().scan().archive_flags;
        let listing = self.listing.as_deref().unwrap_or_default();

        let mut seen = HashSet::new();
        let total_size = listing
            .iter()
            .filter(|e| seen.insert(e.name.as_slice()))
            .map(|e| e.unpacked_size)
            .sum();

        Ok(ArchiveInfo {
            volume_count: self.chain.len(),
            entry_count: listing.len(),
            file_count: seen.len(),
            total_size,
            packed_size: listing.iter().map(|e| e.packed_size).sum(),
            is_multivolume: flags.is_volume(),
            new_numbering: flags.new_numbering(),
            is_solid: flags.is_solid(),
            is_locked: flags.is_locked(),
            has_comment: flags.has_comment(),
            has_recovery_record: flags.has_recovery_record(),
            has_encrypted_header: flags.headers_encrypted(),
            has_encrypted_entries: listing.iter().any(|e| e.is_encrypted()),
        })
    }
}
