//! Options for opening archives.

use crate::volume::DEFAULT_MAX_VOLUMES;

/// Options controlling how an archive is opened and read.
///
/// # Example
///
/// ```rust,no_run
/// use rarstore::{Archive, OpenOptions};
///
/// let options = OpenOptions::new()
///     .verify_crc(true)
///     .strict_continuation(true)
///     .max_volumes(64);
/// let mut archive = Archive::open_with_options("movie.part01.rar", options)?;
/// # Ok::<(), rarstore::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub(crate) verify_crc: bool,
    pub(crate) strict_continuation: bool,
    pub(crate) max_volumes: usize,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            verify_crc: false,
            strict_continuation: false,
            max_volumes: DEFAULT_MAX_VOLUMES,
        }
    }
}

impl OpenOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks stored CRC-32 values while reading content.
    ///
    /// A part that continues in the next volume is checked against its own
    /// bytes; the last part is checked against the whole file. A mismatch
    /// fails the read with [`Error::CrcMismatch`](crate::Error::CrcMismatch).
    pub fn verify_crc(mut self, verify: bool) -> Self {
        self.verify_crc = verify;
        self
    }

    /// Rejects split files whose parts do not link up through their
    /// continuation flags.
    ///
    /// When disabled (the default), inconsistencies are logged and the parts
    /// are concatenated in chain order.
    pub fn strict_continuation(mut self, strict: bool) -> Self {
        self.strict_continuation = strict;
        self
    }

    /// Limits the number of volumes a chain may have.
    pub fn max_volumes(mut self, max: usize) -> Self {
        self.max_volumes = max.max(1);
        self
    }

    /// Returns whether CRC verification is enabled.
    pub fn is_verify_crc(&self) -> bool {
        self.verify_crc
    }

    /// Returns whether continuation checks are strict.
    pub fn is_strict_continuation(&self) -> bool {
        self.strict_continuation
    }

    /// Returns the volume limit.
    pub fn volume_limit(&self) -> usize {
        self.max_volumes
    }
}
