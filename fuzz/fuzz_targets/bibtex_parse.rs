//! Fuzz target for BibTeX parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run bibtex_parse

#![no_main]

use bibcanon::record::io_bibtex::fuzz_parse_bibtex;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Bibliographies are small; larger inputs only slow the fuzzer down.
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = fuzz_parse_bibtex(text);
    }
});
