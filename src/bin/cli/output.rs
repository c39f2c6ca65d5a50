//! Output formatting for CLI operations.

use std::collections::HashSet;
use std::path::Path;

use rarstore::{ArchiveInfo, Entry, ExtractResult};
use serde_json::json;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a list of entries
    fn format_list(&self, entries: &[Entry], technical: bool) -> String;

    /// Formats archive information
    fn format_info(&self, info: &ArchiveInfo, volumes: &[&Path]) -> String;

    /// Formats extraction results
    fn format_extract_result(&self, result: &ExtractResult) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_list(&self, entries: &[Entry], technical: bool) -> String {
        let mut output = String::new();

        // Header
        if technical {
            output.push_str(&format!(
                "{:>12} {:>12} {:>19} {:>8} {:>4} {:>5} {}\n",
                "Size", "Packed", "Modified", "CRC", "Vol", "Split", "Name"
            ));
        } else {
            output.push_str(&format!("{:>12} {:>19} {}\n", "Size", "Modified", "Name"));
        }
        output.push_str(&"-".repeat(70));
        output.push('\n');

        let mut total_size: u64 = 0;
        let mut file_count = 0;
        let mut dir_count = 0;
        let mut seen = HashSet::new();

        for entry in entries {
            let first_part = seen.insert(entry.name.as_slice());
            if first_part {
                if entry.has_directory_attribute() && entry.unpacked_size == 0 {
                    dir_count += 1;
                } else {
                    file_count += 1;
                    total_size += entry.unpacked_size;
                }
            }

            let type_indicator = if entry.has_directory_attribute() { "/" } else { "" };

            if technical {
                let split = match (entry.continued_from_previous(), entry.continues_in_next()) {
                    (false, false) => "",
                    (false, true) => "->",
                    (true, true) => "<->",
                    (true, false) => "<-",
                };
                output.push_str(&format!(
                    "{:>12} {:>12} {:>19} {:08X} {:>4} {:>5} {}{}\n",
                    entry.unpacked_size,
                    entry.packed_size,
                    entry.modified,
                    entry.crc32,
                    entry.volume_index + 1,
                    split,
                    entry.name_lossy(),
                    type_indicator
                ));
            } else if first_part {
                output.push_str(&format!(
                    "{:>12} {:>19} {}{}\n",
                    humanize_bytes(entry.unpacked_size),
                    entry.modified,
                    entry.name_lossy(),
                    type_indicator
                ));
            }
        }

        // Footer
        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{} files, {} directories, {} total\n",
            file_count,
            dir_count,
            humanize_bytes(total_size)
        ));

        output
    }

    fn format_info(&self, info: &ArchiveInfo, volumes: &[&Path]) -> String {
        let yes_no = |b: bool| if b { "Yes" } else { "No" };
        let mut output = String::new();

        output.push_str("Archive Information:\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!("  Files:          {}\n", info.file_count));
        output.push_str(&format!("  File blocks:    {}\n", info.entry_count));
        output.push_str(&format!(
            "  Total size:     {}\n",
            humanize_bytes(info.total_size)
        ));
        output.push_str(&format!(
            "  Stored bytes:   {}\n",
            humanize_bytes(info.packed_size)
        ));
        output.push_str(&format!("  Multi-volume:   {}\n", yes_no(info.is_multivolume)));
        output.push_str(&format!("  Solid:          {}\n", yes_no(info.is_solid)));
        output.push_str(&format!("  Locked:         {}\n", yes_no(info.is_locked)));
        output.push_str(&format!("  Comment:        {}\n", yes_no(info.has_comment)));
        output.push_str(&format!(
            "  Recovery data:  {}\n",
            yes_no(info.has_recovery_record)
        ));
        output.push_str(&format!(
            "  Encrypted:      {}\n",
            yes_no(info.has_encrypted_entries || info.has_encrypted_header)
        ));

        output.push_str(&format!("  Volumes:        {}\n", info.volume_count));
        for (index, path) in volumes.iter().enumerate() {
            output.push_str(&format!("    {:>4}  {}\n", index + 1, path.display()));
        }

        output
    }

    fn format_extract_result(&self, result: &ExtractResult) -> String {
        format!(
            "Extracted {} files and {} directories ({})\n",
            result.files_extracted,
            result.directories_created,
            humanize_bytes(result.bytes_extracted)
        )
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_list(&self, entries: &[Entry], _technical: bool) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "name": e.name_lossy(),
                    "size": e.unpacked_size,
                    "packed_size": e.packed_size,
                    "modified": e.modified.as_unix_secs(),
                    "crc32": e.crc32,
                    "host_os": e.host_os.name(),
                    "attributes": e.attributes,
                    "volume": e.volume_index,
                    "continued_from_previous": e.continued_from_previous(),
                    "continues_in_next": e.continues_in_next(),
                    "is_directory": e.has_directory_attribute(),
                    "encrypted": e.is_encrypted(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_info(&self, info: &ArchiveInfo, volumes: &[&Path]) -> String {
        let obj = json!({
            "volume_count": info.volume_count,
            "volumes": volumes.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "file_count": info.file_count,
            "entry_count": info.entry_count,
            "total_size": info.total_size,
            "packed_size": info.packed_size,
            "is_multivolume": info.is_multivolume,
            "new_numbering": info.new_numbering,
            "is_solid": info.is_solid,
            "is_locked": info.is_locked,
            "has_comment": info.has_comment,
            "has_recovery_record": info.has_recovery_record,
            "has_encrypted_entries": info.has_encrypted_entries,
            "has_encrypted_header": info.has_encrypted_header,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_extract_result(&self, result: &ExtractResult) -> String {
        let obj = json!({
            "files_extracted": result.files_extracted,
            "directories_created": result.directories_created,
            "bytes_extracted": result.bytes_extracted,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
