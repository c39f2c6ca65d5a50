//! Fuzz target for next-volume name derivation.
//!
//! Run with: cargo +nightly fuzz run volume_naming

#![no_main]

use libfuzzer_sys::fuzz_target;
use rarstore::volume::next_volume_path;
use std::path::Path;

fuzz_target!(|name: &str| {
    if let Ok(next) = next_volume_path(Path::new(name)) {
        // The successor stays in the same directory and is a different file
        assert_eq!(next.parent(), Path::new(name).parent());
        assert_ne!(next.as_path(), Path::new(name));
    }
});
