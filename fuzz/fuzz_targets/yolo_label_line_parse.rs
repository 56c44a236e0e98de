//! Fuzz target for single-line YOLO label parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use yoloaug::label::io_yolo::fuzz_parse_label_line;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_label_line(line);
});
