//! Exit codes for the CLI tool.

use rarstore::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Archive format error
pub const BAD_ARCHIVE: i32 = 3;
/// Archive uses a feature this reader does not implement
pub const UNSUPPORTED: i32 = 4;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadArchive,
    Unsupported,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::Unsupported => UNSUPPORTED,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a rarstore error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) | Error::VolumeMissing { .. } => ExitCode::IoError,
        Error::NotAnArchive { .. }
        | Error::UnknownBlockType { .. }
        | Error::CorruptHeader { .. }
        | Error::TruncatedData { .. }
        | Error::CrcMismatch { .. }
        | Error::BrokenContinuation { .. }
        | Error::VolumeCycle { .. } => ExitCode::BadArchive,
        Error::UnsupportedCompressionMethod { .. }
        | Error::UnsupportedOs { .. }
        | Error::UnsupportedVolumeNaming { .. }
        | Error::UnsupportedFeature { .. } => ExitCode::Unsupported,
        Error::EntryNotFound { .. } => ExitCode::BadArgs,
        Error::PathTraversal { .. } | Error::ResourceLimitExceeded(_) => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
