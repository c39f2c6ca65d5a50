//! Next-volume file name derivation.
//!
//! Purely lexical: no file system access. Rules are tried in order on the
//! file name:
//!
//! | Current | Next |
//! |---------|------|
//! | `name.part<N>.rar` (`part` in any case) | `name.part<N+1>.rar` |
//! | `name.r<N>` | `name.r<N+1>` |
//! | `name.rar` | `name.r00` |
//!
//! The volume number keeps its zero-padded width (`.part009.rar` becomes
//! `.part010.rar`) and only grows when the increment carries past it
//! (`.r99` becomes `.r100`).

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Returns the path of the volume following `path`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedVolumeNaming`] if the file name matches none
/// of the known schemes or is not valid UTF-8.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use rarstore::volume::next_volume_path;
///
/// let next = next_volume_path(Path::new("backup/data.part09.rar")).unwrap();
/// assert_eq!(next, Path::new("backup/data.part10.rar"));
///
/// let next = next_volume_path(Path::new("data.rar")).unwrap();
/// assert_eq!(next, Path::new("data.r00"));
/// ```
pub fn next_volume_path(path: &Path) -> Result<PathBuf> {
    let unsupported = || Error::UnsupportedVolumeNaming {
        path: path.display().to_string(),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(unsupported)?;
    let next = next_file_name(file_name).ok_or_else(unsupported)?;
    Ok(path.with_file_name(next))
}

/// Applies the naming rules to a bare file name.
fn next_file_name(name: &str) -> Option<String> {
    if let Some(next) = next_part_name(name) {
        return Some(next);
    }
    if let Some((stem, digits)) = split_numbered_suffix(name, ".r") {
        return Some(format!("{}.r{}", stem, increment_digits(digits)));
    }
    name.strip_suffix(".rar")
        .map(|stem| format!("{}.r00", stem))
}

/// `name.part<N>.rar` -> `name.part<N+1>.rar`, keeping the case of `part`.
fn next_part_name(name: &str) -> Option<String> {
    let without_ext = name.strip_suffix(".rar")?;
    let digit_count = without_ext
        .bytes()
        .rev()
        .take_while(u8::is_ascii_digit)
        .count();
    let digits_start = without_ext.len() - digit_count;
    let digits = &without_ext[digits_start..];
    if digits.is_empty() {
        return None;
    }
    let before_digits = &without_ext[..digits_start];
    let keyword_start = before_digits.len().checked_sub(".part".len())?;
    let keyword = before_digits.get(keyword_start..)?;
    if !keyword.eq_ignore_ascii_case(".part") {
        return None;
    }
    Some(format!(
        "{}{}.rar",
        before_digits,
        increment_digits(digits)
    ))
}

/// Splits `name` into the part before `marker` and a non-empty run of ASCII
/// digits that ends the name.
fn split_numbered_suffix<'a>(name: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    let pos = name.rfind(marker)?;
    let digits = &name[pos + marker.len()..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((&name[..pos], digits))
}

/// Adds one to a decimal digit string, keeping its width unless the carry
/// overflows it.
fn increment_digits(digits: &str) -> String {
    let mut out = digits.as_bytes().to_vec();
    for byte in out.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&out).into_owned();
        }
    }
    out.insert(0, b'1');
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(name: &str) -> Option<String> {
        next_volume_path(Path::new(name))
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    }

    #[test]
    fn test_part_scheme() {
        assert_eq!(next("a.part1.rar").as_deref(), Some("a.part2.rar"));
        assert_eq!(next("a.part009.rar").as_deref(), Some("a.part010.rar"));
        assert_eq!(next("a.part99.rar").as_deref(), Some("a.part100.rar"));
        assert_eq!(next("a.Part01.rar").as_deref(), Some("a.Part02.rar"));
        assert_eq!(next("a.PART7.rar").as_deref(), Some("a.PART8.rar"));
    }

    #[test]
    fn test_old_scheme() {
        assert_eq!(next("a.rar").as_deref(), Some("a.r00"));
        assert_eq!(next("a.r00").as_deref(), Some("a.r01"));
        assert_eq!(next("a.r09").as_deref(), Some("a.r10"));
        assert_eq!(next("a.r99").as_deref(), Some("a.r100"));
        assert_eq!(next("a.r5").as_deref(), Some("a.r6"));
    }

    #[test]
    fn test_directory_is_kept() {
        let p = next_volume_path(Path::new("/tmp/sets/x.part1.rar")).unwrap();
        assert_eq!(p, Path::new("/tmp/sets/x.part2.rar"));
        let p = next_volume_path(Path::new("dir.r00/x.rar")).unwrap();
        assert_eq!(p, Path::new("dir.r00/x.r00"));
    }

    #[test]
    fn test_part_without_digits_is_plain_rar() {
        assert_eq!(next("a.part.rar").as_deref(), Some("a.part.r00"));
        assert_eq!(next("report2.rar").as_deref(), Some("report2.r00"));
    }

    #[test]
    fn test_unsupported() {
        for name in ["a.zip", "a.r", "a.rx1", "archive", "a.RAR", ""] {
            let err = next_volume_path(Path::new(name)).unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedVolumeNaming { .. }),
                "{name}: {err:?}"
            );
        }
    }

    #[test]
    fn test_increment_digits() {
        assert_eq!(increment_digits("0"), "1");
        assert_eq!(increment_digits("9"), "10");
        assert_eq!(increment_digits("0099"), "0100");
        assert_eq!(increment_digits("999"), "1000");
    }
}
