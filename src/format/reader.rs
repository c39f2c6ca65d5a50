//! Low-level binary reading utilities for RAR block parsing.
//!
//! All multi-byte integers in the format are little-endian. The helpers
//! here return plain `io::Result`; [`truncated`] turns a short read into
//! [`Error::TruncatedData`] at the call sites that decode headers.

use std::io::{self, Read};

use crate::Error;

/// Reads a single byte.
pub fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Reads an unsigned 16-bit little-endian integer.
pub fn read_u16_le<R: Read>(r: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Reads an unsigned 32-bit little-endian integer.
pub fn read_u32_le<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Reads exactly `len` bytes into a new vector.
pub fn read_bytes<R: Read>(r: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Maps a short read to [`Error::TruncatedData`], passing every other I/O
/// error through unchanged.
pub fn truncated(offset: u64, context: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::TruncatedData { offset, context }
        } else {
            Error::Io(e)
        }
    }
}
