//! Fuzz target for the block scanner with arbitrary byte input.
//!
//! Exercises block, file header and end block decoding with malformed or
//! adversarial input, looking for panics, hangs, or scans that fail to
//! advance.
//!
//! Run with: cargo +nightly fuzz run scan_volume

#![no_main]

use libfuzzer_sys::fuzz_target;
use rarstore::format::SIGNATURE;
use rarstore::format::parser::scan_volume;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Raw input mostly fails the marker check; also try it behind a valid signature
    let _ = scan_volume(&mut Cursor::new(data));

    let mut framed = SIGNATURE.to_vec();
    framed.extend_from_slice(data);
    if let Ok(scan) = scan_volume(&mut Cursor::new(framed.as_slice())) {
        for entry in &scan.entries {
            let range = entry.data_range();
            assert!(range.end as usize <= framed.len());
            let _ = entry.is_directory();
            let _ = entry.modified.as_system_time();
        }
    }
});
