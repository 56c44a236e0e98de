//! YOLO label file reader and writer.
//!
//! A label file holds one object per line:
//! `<class_index> <x_center> <y_center> <width> <height>`, with the four
//! geometry values normalized to the image size. Blank lines are ignored and
//! a file without any object lines is a valid, empty label set.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info};

use super::{LabeledBox, StorageRow, YoloBox};
use crate::error::YoloaugError;

pub const LABEL_EXTENSION: &str = "txt";

/// Decimal places kept when writing coordinates.
const COORD_DECIMALS: i32 = 6;

#[derive(Debug, PartialEq)]
struct YoloLabelRow {
    class_id: usize,
    cx: f64,
    cy: f64,
    w: f64,
    h: f64,
}

/// Read a label file and resolve each row's class against `classes`.
///
/// Geometry is clamped into the unit frame, never rejected. A class index
/// outside `classes` fails the whole file.
pub fn read_label_file(path: &Path, classes: &[String]) -> Result<Vec<LabeledBox>, YoloaugError> {
    let content = fs::read_to_string(path).map_err(|source| YoloaugError::LabelRead {
        path: path.to_path_buf(),
        source,
    })?;

    let boxes = parse_label_str(&content, classes, path)?;
    if boxes.is_empty() {
        info!("No object in {}", path.display());
    }
    Ok(boxes)
}

/// Parse label text. `path` is only used for error context.
pub fn parse_label_str(
    content: &str,
    classes: &[String],
    path: &Path,
) -> Result<Vec<LabeledBox>, YoloaugError> {
    let mut boxes = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;
        let Some(row) = parse_label_line(line, path, line_num)? else {
            continue;
        };

        let class_name =
            classes
                .get(row.class_id)
                .ok_or_else(|| YoloaugError::ClassIndexOutOfRange {
                    path: path.to_path_buf(),
                    line: line_num,
                    index: row.class_id,
                    class_count: classes.len(),
                })?;

        let raw = YoloBox::new(row.cx, row.cy, row.w, row.h);
        let bbox = raw.clamped();
        if bbox != raw {
            debug!(
                "{}:{}: clamped out-of-frame box {:?} to {:?}",
                path.display(),
                line_num,
                raw,
                bbox
            );
        }

        boxes.push(LabeledBox {
            class_id: row.class_id,
            class_name: class_name.clone(),
            bbox,
        });
    }

    Ok(boxes)
}

/// Write storage-form rows, one newline-terminated line per box.
pub fn write_label_file(path: &Path, rows: &[StorageRow]) -> Result<(), YoloaugError> {
    let write_err = |source| YoloaugError::LabelWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).map_err(write_err)?;
    for row in rows {
        writeln!(file, "{}", format_label_line(row)).map_err(write_err)?;
    }
    file.flush().map_err(write_err)
}

/// Formats a row as `class_index cx cy w h`.
pub fn format_label_line(row: &StorageRow) -> String {
    let [cx, cy, w, h] = row.bbox.values();
    format!(
        "{} {} {} {} {}",
        row.class_id,
        format_coord(cx),
        format_coord(cy),
        format_coord(w),
        format_coord(h)
    )
}

/// Rounds to a fixed number of decimals and prints the shortest form, so
/// `0.20000000000000004` is written as `0.2` and `1` as `1.0`.
fn format_coord(value: f64) -> String {
    let scale = 10f64.powi(COORD_DECIMALS);
    let rounded = (value * scale).round() / scale;
    // Avoid printing "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut text = rounded.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<YoloLabelRow>, YoloaugError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();

    if tokens.len() < 5 {
        return Err(YoloaugError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("expected 5 tokens, found {}", tokens.len()),
        });
    }

    if tokens.len() > 5 {
        return Err(YoloaugError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: "segmentation/pose rows are not supported; expected a detection box"
                .to_string(),
        });
    }

    let class_id = tokens[0]
        .parse::<usize>()
        .map_err(|_| YoloaugError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "invalid class_index '{}'; expected non-negative integer",
                tokens[0]
            ),
        })?;

    let cx = parse_f64_token(tokens[1], "x_center", file_path, line_num)?;
    let cy = parse_f64_token(tokens[2], "y_center", file_path, line_num)?;
    let w = parse_f64_token(tokens[3], "width", file_path, line_num)?;
    let h = parse_f64_token(tokens[4], "height", file_path, line_num)?;

    Ok(Some(YoloLabelRow {
        class_id,
        cx,
        cy,
        w,
        h,
    }))
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), YoloaugError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, YoloaugError> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| YoloaugError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
        })?;

    if !value.is_finite() {
        return Err(YoloaugError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("{field_name} '{raw}' is not finite"),
        });
    }

    Ok(value)
}
