//! Fuzz target for whole label files.
//!
//! Any successfully parsed box must already be clamped into the unit frame.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use yoloaug::label::io_yolo::parse_label_str;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    let classes = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    if let Ok(boxes) = parse_label_str(content, &classes, Path::new("<fuzz>")) {
        for labeled in boxes {
            assert!(labeled.bbox.is_within_unit_frame());
        }
    }
});
