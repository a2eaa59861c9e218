#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

use ico_codec::IcoFile;

/// Keep the harness bounded: real icon files are a few megabytes at most, and
/// oversized inputs only slow the corpus down.
const MAX_INPUT_BYTES: usize = 4 * 1024 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > MAX_INPUT_BYTES {
        return;
    }
    let _ = IcoFile::read(&mut Cursor::new(data));
});
