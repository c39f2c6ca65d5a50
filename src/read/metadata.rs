//! Metadata preservation for extracted files.

use std::path::Path;

use filetime::FileTime;

use crate::timestamp::DosDateTime;

/// Sets the modification time of an extracted file.
///
/// The stored time carries no zone and is applied as UTC. Invalid dates
/// are skipped, and failures are logged rather than returned: the content
/// has already been written at that point.
pub(crate) fn apply_modified_time(path: &Path, modified: &DosDateTime) {
    let Some(secs) = modified.as_unix_secs() else {
        log::debug!(
            "Not setting modification time on '{}': invalid date {}",
            path.display(),
            modified
        );
        return;
    };

    if let Err(e) = filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)) {
        log::warn!(
            "Failed to set modification time on '{}': {}",
            path.display(),
            e
        );
    }
}
