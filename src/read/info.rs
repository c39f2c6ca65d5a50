//! Archive information types.

/// Summary of an opened archive and its volume chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveInfo {
    /// Number of volumes in the chain.
    pub volume_count: usize,
    /// Number of file blocks across all volumes.
    pub entry_count: usize,
    /// Number of distinct names.
    pub file_count: usize,
    /// Sum of the unpacked sizes of all distinct names.
    pub total_size: u64,
    /// Sum of the stored bytes of all file blocks.
    pub packed_size: u64,
    /// Whether the archive is split into volumes.
    pub is_multivolume: bool,
    /// Whether volumes use the `name.partN.rar` scheme.
    pub new_numbering: bool,
    /// Whether the archive is solid.
    pub is_solid: bool,
    /// Whether the archive is locked.
    pub is_locked: bool,
    /// Whether an archive comment is present.
    pub has_comment: bool,
    /// Whether a recovery record is present.
    pub has_recovery_record: bool,
    /// Whether block headers are encrypted.
    pub has_encrypted_header: bool,
    /// Whether any entry is encrypted.
    pub has_encrypted_entries: bool,
}

/// Result of an [`Archive::extract_all`](super::Archive::extract_all) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractResult {
    /// Number of files written.
    pub files_extracted: usize,
    /// Number of directories created for directory entries.
    pub directories_created: usize,
    /// Total bytes written.
    pub bytes_extracted: u64,
}
