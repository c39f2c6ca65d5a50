//! Block scanner for a single volume.
//!
//! The scanner walks the blocks of one volume as a small state machine:
//!
//! ```text
//! AwaitingMarker -> AwaitingArchive -> ScanningEntries -> Done
//!        \                 \                  \
//!         +-----------------+------------------+--> Failed
//! ```
//!
//! Each call to [`BlockScanner::next_step`] decodes exactly one block and
//! leaves the reader at that block's end, so header and content bytes are
//! never reinterpreted as the next header. The end block is reported as the
//! [`ScanStep::End`] variant; reaching it is normal termination, not an
//! error. [`scan_volume`] drives the scanner to completion and collects the
//! result into a [`VolumeScan`].
//!
//! Blocks other than marker, archive, file and end are skipped only when
//! they carry the skip-if-unknown flag; otherwise the scan fails with
//! [`Error::UnknownBlockType`], even for block types the table knows.

use std::io::{Read, Seek, SeekFrom};

use log::{debug, trace};

use super::files::FileHeader;
use super::header::{BlockHeader, BlockType};
use super::reader::{read_bytes, read_u16_le, read_u32_le, truncated};
use super::{archive_flags, end_flags};
use crate::{Error, Result};

/// Flags of the archive block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveFlags(pub u16);

impl ArchiveFlags {
    fn has(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    /// The archive is split into volumes.
    pub fn is_volume(self) -> bool {
        self.has(archive_flags::VOLUME)
    }

    /// An archive comment is present.
    pub fn has_comment(self) -> bool {
        self.has(archive_flags::COMMENT)
    }

    /// The archive is locked.
    pub fn is_locked(self) -> bool {
        self.has(archive_flags::LOCK)
    }

    /// Solid archive.
    pub fn is_solid(self) -> bool {
        self.has(archive_flags::SOLID)
    }

    /// Volumes are named `name.partN.rar`.
    pub fn new_numbering(self) -> bool {
        self.has(archive_flags::NEW_NUMBERING)
    }

    /// Authenticity information is present.
    pub fn has_authenticity(self) -> bool {
        self.has(archive_flags::AUTHENTICITY)
    }

    /// A recovery record is present.
    pub fn has_recovery_record(self) -> bool {
        self.has(archive_flags::PROTECT)
    }

    /// Block headers are encrypted.
    pub fn headers_encrypted(self) -> bool {
        self.has(archive_flags::PASSWORD)
    }

    /// This is the first volume of a set.
    pub fn is_first_volume(self) -> bool {
        self.has(archive_flags::FIRST_VOLUME)
    }
}

/// The decoded end-of-archive block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndOfVolume {
    /// Raw end block flags.
    pub flags: u16,
    /// CRC-32 of the archive data, when stored.
    pub data_crc: Option<u32>,
    /// Volume number (0-based), when stored.
    pub volume_number: Option<u16>,
}

impl EndOfVolume {
    /// Another volume follows this one.
    pub fn has_more_volumes(&self) -> bool {
        self.flags & end_flags::NEXT_VOLUME != 0
    }
}

/// Position of the scanner in a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Expecting the marker block at offset 0.
    AwaitingMarker,
    /// Expecting the archive block right after the marker.
    AwaitingArchive,
    /// Yielding file entries until the end block.
    ScanningEntries,
    /// The end block has been read.
    Done,
    /// A decode error aborted the scan.
    Failed,
}

/// The outcome of decoding one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStep {
    /// The marker block.
    Marker,
    /// The archive block.
    Archive(ArchiveFlags),
    /// A file block.
    Entry(FileHeader),
    /// A block without meaning to this reader, skipped whole.
    Skipped(BlockHeader),
    /// The end block; the volume has no more blocks.
    End(EndOfVolume),
}

/// Decodes the blocks of one volume in order.
#[derive(Debug)]
pub struct BlockScanner<'a, R> {
    reader: &'a mut R,
    state: ScanState,
    offset: u64,
    stream_len: u64,
}

impl<'a, R: Read + Seek> BlockScanner<'a, R> {
    /// Creates a scanner positioned at the start of the stream.
    pub fn new(reader: &'a mut R) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {
            reader,
            state: ScanState::AwaitingMarker,
            offset: 0,
            stream_len,
        })
    }

    /// Returns the current state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Returns the offset of the next block header.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Decodes the next block.
    ///
    /// Returns `Ok(None)` once the end block has been yielded. After an
    /// error the scanner is [`ScanState::Failed`] and keeps returning
    /// `Ok(None)`.
    pub fn next_step(&mut self) -> Result<Option<ScanStep>> {
        if matches!(self.state, ScanState::Done | ScanState::Failed) {
            return Ok(None);
        }
        match self.step() {
            Ok(step) => Ok(Some(step)),
            Err(e) => {
                self.state = ScanState::Failed;
                Err(e)
            }
        }
    }

    fn step(&mut self) -> Result<ScanStep> {
        let offset = self.offset;
        let block = BlockHeader::parse(&mut *self.reader, offset)?;
        trace!(
            "block {} at {:#x}: flags={:#06x} header_size={} data_size={:?}",
            block.block_type, offset, block.flags, block.header_size, block.data_size
        );

        let (step, block_ending) = match (self.state, block.block_type) {
            (ScanState::AwaitingMarker, BlockType::Marker) => {
                self.state = ScanState::AwaitingArchive;
                (ScanStep::Marker, block.block_ending())
            }
            (ScanState::AwaitingMarker, other) => {
                return Err(Error::corrupt_header(
                    offset,
                    format!("expected marker block, found {}", other),
                ));
            }
            (ScanState::AwaitingArchive, BlockType::Archive) => {
                self.state = ScanState::ScanningEntries;
                (
                    ScanStep::Archive(ArchiveFlags(block.flags)),
                    block.block_ending(),
                )
            }
            (ScanState::AwaitingArchive, other) => {
                return Err(Error::corrupt_header(
                    offset,
                    format!("expected archive block, found {}", other),
                ));
            }
            (_, BlockType::File) => {
                let file = FileHeader::decode(&mut *self.reader, block)?;
                let ending = file.block_ending();
                (ScanStep::Entry(file), ending)
            }
            (_, BlockType::Eof) => {
                let end = self.read_end_block(&block)?;
                self.state = ScanState::Done;
                (ScanStep::End(end), block.block_ending())
            }
            (_, other) if !block.skip_if_unknown() => {
                return Err(Error::UnknownBlockType {
                    offset,
                    type_code: other.code(),
                });
            }
            (_, other) => {
                debug!(
                    "skipping {} block at {:#x} ({} bytes)",
                    other,
                    offset,
                    block.block_ending() - offset
                );
                (ScanStep::Skipped(block), block.block_ending())
            }
        };

        if block_ending > self.stream_len {
            return Err(Error::TruncatedData {
                offset,
                context: "block data",
            });
        }
        self.reader.seek(SeekFrom::Start(block_ending))?;
        self.offset = block_ending;
        Ok(step)
    }

    fn read_end_block(&mut self, block: &BlockHeader) -> Result<EndOfVolume> {
        let rest = usize::from(block.header_size - block.prefix_size());
        let body = read_bytes(&mut *self.reader, rest).map_err(truncated(block.block_start, "end block"))?;
        let mut b = body.as_slice();

        let mut end = EndOfVolume {
            flags: block.flags,
            ..Default::default()
        };
        if block.flags & end_flags::DATA_CRC != 0 && b.len() >= 4 {
            end.data_crc = Some(read_u32_le(&mut b)?);
        }
        if block.flags & end_flags::VOLUME_NUMBER != 0 && b.len() >= 2 {
            end.volume_number = Some(read_u16_le(&mut b)?);
        }
        Ok(end)
    }
}

/// Everything learned from scanning one volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeScan {
    /// Flags of the archive block.
    pub archive_flags: ArchiveFlags,
    /// File entries in block order.
    pub entries: Vec<FileHeader>,
    /// The end block.
    pub end: EndOfVolume,
    /// Number of blocks skipped as unknown or uninteresting.
    pub skipped_blocks: usize,
}

impl VolumeScan {
    /// The archive is split into volumes.
    pub fn is_volume(&self) -> bool {
        self.archive_flags.is_volume()
    }

    /// This is the first volume of a set.
    pub fn is_first_volume(&self) -> bool {
        self.archive_flags.is_first_volume()
    }

    /// The end block announces another volume.
    pub fn has_more_volumes(&self) -> bool {
        self.end.has_more_volumes()
    }

    /// The chain continues after this volume.
    pub fn continues(&self) -> bool {
        self.is_volume() && self.has_more_volumes()
    }

    /// Volume number stored in the end block, if any.
    pub fn volume_number(&self) -> Option<u16> {
        self.end.volume_number
    }
}

/// Scans a whole volume from its first byte to its end block.
///
/// # Errors
///
/// Any decode error aborts the scan and is returned as is. A stream that ends
/// before the end block yields [`Error::TruncatedData`].
pub fn scan_volume<R: Read + Seek>(reader: &mut R) -> Result<VolumeScan> {
    let mut scanner = BlockScanner::new(reader)?;
    let mut scan = VolumeScan::default();

    while let Some(step) = scanner.next_step()? {
        match step {
            ScanStep::Marker => {}
            ScanStep::Archive(flags) => scan.archive_flags = flags,
            ScanStep::Entry(file) => scan.entries.push(file),
            ScanStep::Skipped(_) => scan.skipped_blocks += 1,
            ScanStep::End(end) => scan.end = end,
        }
    }

    debug!(
        "scanned volume: {} entries, {} skipped blocks, more volumes: {}",
        scan.entries.len(),
        scan.skipped_blocks,
        scan.has_more_volumes()
    );
    Ok(scan)
}
