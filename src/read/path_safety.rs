//! Path safety validation for archive extraction.
//!
//! Entry names are untrusted. Before an entry is written below a destination
//! directory its name is split on both `/` and `\` (names archived on
//! Windows use backslashes) and every component is checked.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Maps an entry name to a path below `dest`.
///
/// # Errors
///
/// Returns [`Error::PathTraversal`] for empty names, absolute names, names
/// with a drive prefix, and names containing a `..` component.
pub(crate) fn validate_entry_path(name: &str, dest: &Path) -> Result<PathBuf> {
    let reject = || Error::PathTraversal {
        path: name.to_string(),
    };

    if name.starts_with(['/', '\\']) || has_drive_prefix(name) {
        return Err(reject());
    }

    let mut relative = PathBuf::new();
    for component in name.split(['/', '\\']) {
        match component {
            "" | "." => continue,
            ".." => return Err(reject()),
            c if c.contains('\0') => return Err(reject()),
            c => relative.push(c),
        }
    }
    if relative.as_os_str().is_empty() {
        return Err(reject());
    }
    Ok(dest.join(relative))
}

fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_relative_names() {
        let dest = Path::new("/out");
        assert_eq!(
            validate_entry_path("a/b.txt", dest).unwrap(),
            Path::new("/out/a/b.txt")
        );
        assert_eq!(
            validate_entry_path("dir\\sub\\c.txt", dest).unwrap(),
            Path::new("/out/dir/sub/c.txt")
        );
        assert_eq!(
            validate_entry_path("./x//y", dest).unwrap(),
            Path::new("/out/x/y")
        );
    }

    #[test]
    fn test_rejects_escapes() {
        let dest = Path::new("/out");
        for name in [
            "/etc/passwd",
            "\\windows\\system32",
            "C:\\boot.ini",
            "c:relative",
            "../up.txt",
            "a/../../up.txt",
            "a\\..\\b",
            "",
            "./",
        ] {
            let err = validate_entry_path(name, dest).unwrap_err();
            assert!(matches!(err, Error::PathTraversal { .. }), "{name}");
        }
    }
}
