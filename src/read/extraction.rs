//! Content reading and extraction.
//!
//! The content of a name is the concatenation of the stored bytes of every
//! entry with that name, in chain order. For a file split across volumes
//! these are its parts; [`OpenOptions`](super::OpenOptions) controls how
//! strictly the parts are checked against each other.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{debug, warn};

use super::metadata::apply_modified_time;
use super::path_safety::validate_entry_path;
use super::{Archive, Entry, ExtractResult};
use crate::{Error, Result};

impl Archive {
    /// Reads the whole content of a name into memory.
    ///
    /// # Errors
    ///
    /// - [`Error::EntryNotFound`] if no entry has that name
    /// - [`Error::UnsupportedFeature`] if the entry is encrypted
    /// - [`Error::TruncatedData`] if a volume ends inside the content
    /// - [`Error::CrcMismatch`] or [`Error::BrokenContinuation`] when the
    ///   corresponding checks are enabled
    pub fn read(&mut self, name: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.read_to(name, &mut out)?;
        Ok(out)
    }

    /// Streams the content of a name into `writer`, returning the number of
    /// bytes written.
    ///
    /// Fails the same way as [`read`](Self::read). Bytes already written
    /// before an error stay written.
    pub fn read_to<W: Write + ?Sized>(
        &mut self,
        name: impl AsRef<[u8]>,
        writer: &mut W,
    ) -> Result<u64> {
        let name = name.as_ref();
        let parts = self.parts_of(name)?;
        self.copy_parts(name, &parts, writer)
    }

    /// Writes the content of a name to the file at `path` and applies its
    /// modification time.
    ///
    /// The file is created or truncated. On failure it is removed again.
    pub fn extract_to(&mut self, name: impl AsRef<[u8]>, path: impl AsRef<Path>) -> Result<u64> {
        let name = name.as_ref();
        let parts = self.parts_of(name)?;
        self.write_file(name, &parts, path.as_ref())
    }

    /// Extracts every name below `dest`, creating directories as needed.
    ///
    /// Entries whose host attributes mark a directory, and which carry no
    /// content, become directories; an empty regular file stays a file.
    /// See [`Entry::has_directory_attribute`]. Names that
    /// would leave `dest` are rejected with [`Error::PathTraversal`] before
    /// anything is written for them. Stops at the first error.
    pub fn extract_all(&mut self, dest: impl AsRef<Path>) -> Result<ExtractResult> {
        let dest = dest.as_ref();
        fs::create_dir_all(dest)?;

        let names: Vec<Vec<u8>> = self.names()?.into_iter().map(<[u8]>::to_vec).collect();
        let mut result = ExtractResult::default();

        for name in names {
            let parts = self.parts_of(&name)?;
            let Some(first) = parts.first() else {
                continue;
            };
            let target = validate_entry_path(&first.name_lossy(), dest)?;

            let is_directory = first.has_directory_attribute()
                && first.unpacked_size == 0
                && parts.iter().all(|p| p.packed_size == 0);
            if is_directory {
                debug!("creating directory {}", target.display());
                fs::create_dir_all(&target)?;
                result.directories_created += 1;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let written = self.write_file(&name, &parts, &target)?;
            debug!("extracted {} ({} bytes)", target.display(), written);
            result.files_extracted += 1;
            result.bytes_extracted += written;
        }

        Ok(result)
    }

    /// Collects the entries holding the content of `name`.
    fn parts_of(&mut self, name: &[u8]) -> Result<Vec<Entry>> {
        let parts: Vec<Entry> = self
            .ensure_listing()?
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect();

        if parts.is_empty() {
            return Err(Error::entry_not_found(name));
        }
        if parts.iter().any(Entry::is_encrypted) {
            return Err(Error::UnsupportedFeature {
                feature: "encrypted entries",
            });
        }
        self.check_continuation(name, &parts)?;
        Ok(parts)
    }

    fn check_continuation(&self, name: &[u8], parts: &[Entry]) -> Result<()> {
        for (index, part) in parts.iter().enumerate() {
            let is_last = index + 1 == parts.len();
            let reason = if index == 0 && part.continued_from_previous() {
                Some("first part continues from a previous volume")
            } else if index > 0 && !part.continued_from_previous() {
                Some("part does not continue the previous part")
            } else if index > 0 && part.volume_index != parts[index - 1].volume_index + 1 {
                Some("parts are not in consecutive volumes")
            } else if !is_last && !part.continues_in_next() {
                Some("part does not continue in the next volume")
            } else if is_last && part.continues_in_next() {
                Some("last part continues past the end of the chain")
            } else {
                None
            };

            if let Some(reason) = reason {
                let entry = String::from_utf8_lossy(name).into_owned();
                if self.options.strict_continuation {
                    return Err(Error::BrokenContinuation {
                        entry,
                        part: index,
                        reason,
                    });
                }
                warn!("entry '{}' part {}: {}", entry, index, reason);
            }
        }
        Ok(())
    }

    fn copy_parts<W: Write + ?Sized>(
        &mut self,
        name: &[u8],
        parts: &[Entry],
        writer: &mut W,
    ) -> Result<u64> {
        let verify = self.options.verify_crc;
        let mut whole = crc32fast::Hasher::new();
        let mut total = 0u64;

        for part in parts {
            let volume = self.chain.get_mut(part.volume_index).ok_or_else(|| {
                Error::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("volume {} is not open", part.volume_index),
                ))
            })?;

            if !verify {
                total += volume.copy_range(part.data_range(), &mut *writer)?;
                continue;
            }

            let mut sink = ChecksumWriter {
                inner: &mut *writer,
                hasher: crc32fast::Hasher::new(),
            };
            total += volume.copy_range(part.data_range(), &mut sink)?;
            let part_hasher = sink.hasher;
            whole.combine(&part_hasher);

            let actual = if part.continues_in_next() {
                part_hasher.finalize()
            } else {
                whole.clone().finalize()
            };
            if actual != part.crc32 {
                return Err(Error::CrcMismatch {
                    entry: String::from_utf8_lossy(name).into_owned(),
                    expected: part.crc32,
                    actual,
                });
            }
        }

        Ok(total)
    }

    fn write_file(&mut self, name: &[u8], parts: &[Entry], path: &Path) -> Result<u64> {
        let mut writer = BufWriter::new(File::create(path)?);
        let written = self
            .copy_parts(name, parts, &mut writer)
            .and_then(|n| writer.flush().map(|()| n).map_err(Error::from));
        drop(writer);

        match written {
            Ok(n) => {
                if let Some(first) = parts.first() {
                    apply_modified_time(path, &first.modified);
                }
                Ok(n)
            }
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(path) {
                    debug!(
                        "could not remove partial file {}: {}",
                        path.display(),
                        remove_err
                    );
                }
                Err(e)
            }
        }
    }
}

/// Forwards writes and hashes the bytes that were accepted.
struct ChecksumWriter<'a, W: ?Sized> {
    inner: &'a mut W,
    hasher: crc32fast::Hasher,
}

impl<W: Write + ?Sized> Write for ChecksumWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
