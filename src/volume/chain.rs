//! Volumes and the chain that links them.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::naming::next_volume_path;
use crate::format::detect::check_signature;
use crate::format::files::FileHeader;
use crate::format::parser::{VolumeScan, scan_volume};
use crate::{Error, Result};

/// Default upper bound on the number of volumes in one chain.
pub const DEFAULT_MAX_VOLUMES: usize = 4096;

/// One physical file of an archive, scanned and kept open.
///
/// A volume owns the volume that follows it, so the first volume owns the
/// whole chain and dropping it closes every handle.
#[derive(Debug)]
pub struct Volume {
    path: PathBuf,
    reader: BufReader<File>,
    scan: VolumeScan,
    next: Option<Box<Volume>>,
}

impl Volume {
    /// Opens `path`, checks its signature, and scans all of its blocks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAnArchive`] if the file cannot be opened or does
    /// not start with the RAR signature, and any scan error otherwise.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| unreadable(path, &e))?;
        Self::from_file(path.to_path_buf(), file)
    }

    fn from_file(path: PathBuf, file: File) -> Result<Self> {
        let mut reader = BufReader::new(file);
        check_signature(&mut reader, &path)?;
        let scan = scan_volume(&mut reader)?;
        debug!(
            "opened volume {} ({} entries)",
            path.display(),
            scan.entries.len()
        );
        Ok(Self {
            path,
            reader,
            scan,
            next: None,
        })
    }

    /// Path the volume was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Result of scanning this volume.
    pub fn scan(&self) -> &VolumeScan {
        &self.scan
    }

    /// File entries of this volume in block order.
    pub fn entries(&self) -> &[FileHeader] {
        &self.scan.entries
    }

    /// The following volume, once the chain has been resolved.
    pub fn next(&self) -> Option<&Volume> {
        self.next.as_deref()
    }

    /// Copies the bytes in `range` to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the volume ends inside the range.
    pub fn copy_range<W: Write + ?Sized>(&mut self, range: Range<u64>, out: &mut W) -> Result<u64> {
        let len = range.end.saturating_sub(range.start);
        self.reader.seek(SeekFrom::Start(range.start))?;
        let copied = io::copy(&mut (&mut self.reader).take(len), out)?;
        if copied < len {
            return Err(Error::TruncatedData {
                offset: range.start + copied,
                context: "entry data",
            });
        }
        Ok(copied)
    }
}

/// The ordered volumes of one archive, starting at the volume it was
/// opened from.
///
/// Only the first volume is opened eagerly. [`resolve`](Self::resolve)
/// follows the naming scheme to open the rest; it runs at most once
/// successfully, and a failed attempt leaves the chain as it was.
#[derive(Debug)]
pub struct VolumeChain {
    head: Volume,
    resolved: bool,
    max_volumes: usize,
}

impl VolumeChain {
    /// Opens the first volume of a chain.
    pub fn open(path: impl AsRef<Path>, max_volumes: usize) -> Result<Self> {
        let head = Volume::open(path)?;
        if head.scan.is_volume() && !head.scan.is_first_volume() {
            warn!(
                "{} is not the first volume of its set; earlier parts are not read",
                head.path.display()
            );
        }
        Ok(Self {
            head,
            resolved: false,
            max_volumes,
        })
    }

    /// Returns true once every volume of the chain has been opened.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Opens and scans every following volume.
    ///
    /// Does nothing if the chain is already resolved.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedVolumeNaming`] if a successor name cannot be derived
    /// - [`Error::VolumeMissing`] if a successor does not exist
    /// - [`Error::VolumeCycle`] if a successor is a volume already in the chain
    /// - [`Error::ResourceLimitExceeded`] past the configured volume count
    /// - any error of [`Volume::open`] for a successor
    pub fn resolve(&mut self) -> Result<()> {
        if self.resolved {
            return Ok(());
        }

        let mut visited = HashSet::new();
        visited.insert(identity(&self.head.path));

        let mut opened: Vec<Volume> = Vec::new();
        loop {
            let tail = opened.last().unwrap_or(&self.head);
            if !tail.scan.continues() {
                break;
            }
            let path = next_volume_path(&tail.path)?;
            let number = opened.len() + 2;
            if number > self.max_volumes {
                return Err(Error::ResourceLimitExceeded(format!(
                    "volume chain longer than {} volumes",
                    self.max_volumes
                )));
            }
            if !visited.insert(identity(&path)) {
                return Err(Error::VolumeCycle {
                    path: path.display().to_string(),
                });
            }

            let volume = open_successor(&path, number)?;
            if !volume.scan.is_volume() {
                warn!(
                    "{} follows a volume but is not marked as one",
                    volume.path.display()
                );
            }
            if volume.scan.is_first_volume() {
                warn!(
                    "{} is marked as the first volume of a set",
                    volume.path.display()
                );
            }
            opened.push(volume);
        }

        let mut next = None;
        for mut volume in opened.into_iter().rev() {
            volume.next = next;
            next = Some(Box::new(volume));
        }
        self.head.next = next;
        self.resolved = true;
        debug!("resolved volume chain of {} volumes", self.len());
        Ok(())
    }

    /// The volume the chain was opened from.
    pub fn first(&self) -> &Volume {
        &self.head
    }

    /// Number of volumes opened so far.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a chain holds at least its first volume.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the opened volumes in chain order.
    pub fn iter(&self) -> Volumes<'_> {
        Volumes {
            next: Some(&self.head),
        }
    }

    /// Returns the volume at `index` in chain order.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Volume> {
        let mut current = &mut self.head;
        for _ in 0..index {
            current = current.next.as_deref_mut()?;
        }
        Some(current)
    }
}

/// Iterator over the volumes of a [`VolumeChain`].
#[derive(Debug, Clone)]
pub struct Volumes<'a> {
    next: Option<&'a Volume>,
}

impl<'a> Iterator for Volumes<'a> {
    type Item = &'a Volume;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next.as_deref();
        Some(current)
    }
}

fn open_successor(path: &Path, number: usize) -> Result<Volume> {
    match File::open(path) {
        Ok(file) => Volume::from_file(path.to_path_buf(), file),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Err(Error::VolumeMissing {
            volume: u32::try_from(number).unwrap_or(u32::MAX),
            path: path.display().to_string(),
            source,
        }),
        Err(e) => Err(unreadable(path, &e)),
    }
}

fn unreadable(path: &Path, e: &io::Error) -> Error {
    Error::NotAnArchive {
        path: path.display().to_string(),
        reason: format!("cannot open file: {}", e),
    }
}

/// Resolves symbolic links so that two names of the same file compare equal.
fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
