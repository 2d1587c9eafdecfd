//! Fuzz target for author list canonicalization.
//!
//! Run with:
//!   cargo +nightly fuzz run author_normalize

#![no_main]

use bibcanon::canon::normalize_authors;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(list) = normalize_authors(text) {
            let _ = normalize_authors(&list.to_string());
        }
    }
});
