//! Command implementations for the CLI tool.

use std::io::{self, Write};
use std::path::Path;

use rarstore::{Archive, OpenOptions};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;

/// List command implementation
pub fn list(
    archive_path: &Path,
    options: OpenOptions,
    technical: bool,
    format: OutputFormat,
) -> ExitCode {
    let formatter = create_formatter(format);

    let mut archive = match open_archive(archive_path, options) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match archive.entries() {
        Ok(entries) => {
            println!("{}", formatter.format_list(entries, technical).trim_end());
            ExitCode::Success
        }
        Err(e) => report(&e),
    }
}

/// Info command implementation
pub fn info(archive_path: &Path, options: OpenOptions, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let mut archive = match open_archive(archive_path, options) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let info = match archive.info() {
        Ok(info) => info,
        Err(e) => return report(&e),
    };
    let volumes = match archive.volume_paths() {
        Ok(paths) => paths,
        Err(e) => return report(&e),
    };

    println!("{}", formatter.format_info(&info, &volumes).trim_end());
    ExitCode::Success
}

/// Cat command implementation
pub fn cat(archive_path: &Path, options: OpenOptions, name: &[u8]) -> ExitCode {
    let mut archive = match open_archive(archive_path, options) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = archive
        .read_to(name, &mut out)
        .and_then(|_| out.flush().map_err(rarstore::Error::from));

    match result {
        Ok(()) => ExitCode::Success,
        Err(rarstore::Error::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::Success,
        Err(e) => report(&e),
    }
}

/// Extract command implementation
pub fn extract(
    archive_path: &Path,
    options: OpenOptions,
    output_dir: &Path,
    format: OutputFormat,
) -> ExitCode {
    let formatter = create_formatter(format);

    let mut archive = match open_archive(archive_path, options) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match archive.extract_all(output_dir) {
        Ok(result) => {
            println!("{}", formatter.format_extract_result(&result).trim_end());
            ExitCode::Success
        }
        Err(e) => report(&e),
    }
}

/// Helper to open an archive
fn open_archive(path: &Path, options: OpenOptions) -> Result<Archive, ExitCode> {
    Archive::open_with_options(path, options).map_err(|e| {
        eprintln!("Error opening archive: {}", e);
        error_to_exit_code(&e)
    })
}

fn report(error: &rarstore::Error) -> ExitCode {
    eprintln!("Error: {}", error);
    error_to_exit_code(error)
}
