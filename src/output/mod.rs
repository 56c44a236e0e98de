//! Validation and persistence of augmentation results.
//!
//! A result is written all-or-nothing: if the label set is empty, or any
//! converted box carries a negative value, neither the image nor the label
//! file is written for that image. If a write fails part way, the files
//! already written for that image are removed again.

pub mod draw;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::RgbImage;
use log::{debug, warn};

use crate::augment::AugmentationResult;
use crate::config::Config;
use crate::error::YoloaugError;
use crate::label::convert::to_storage_form;
use crate::label::io_yolo::{write_label_file, LABEL_EXTENSION};
use crate::label::StorageRow;

/// Extension used for every written image.
pub const IMAGE_EXTENSION: &str = "jpg";

/// What happened to one augmentation result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { boxes: usize },
    EmptyLabels,
    NegativeElement,
}

/// Output file locations for one augmented stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub image: PathBuf,
    pub label: PathBuf,
    pub bb_image: PathBuf,
}

impl OutputPaths {
    pub fn new(config: &Config, augmented_stem: &str) -> Self {
        let image_name = format!("{augmented_stem}.{IMAGE_EXTENSION}");
        Self {
            image: config.out_img_pth.join(&image_name),
            label: config
                .out_lab_pth
                .join(format!("{augmented_stem}.{LABEL_EXTENSION}")),
            bb_image: config.bb_img_pth.join(image_name),
        }
    }
}

/// Returns true if any numeric field of any row is negative.
pub fn has_negative_element(rows: &[StorageRow]) -> bool {
    rows.iter().any(StorageRow::has_negative)
}

/// Validates `result` and writes its image and label file.
///
/// With `need_save_bb_image` set, a copy of the image with the boxes drawn
/// on it is written to the visualization directory as well.
pub fn save_augmentation(
    result: &AugmentationResult,
    augmented_stem: &str,
    config: &Config,
    need_save_bb_image: bool,
) -> Result<WriteOutcome, YoloaugError> {
    if result.labels.is_empty() {
        warn!("Label file is empty for {augmented_stem}");
        return Ok(WriteOutcome::EmptyLabels);
    }

    let rows = to_storage_form(&result.labels, &config.classes)?;
    if has_negative_element(&rows) {
        warn!("Found Negative element in Transformed Bounding Box for {augmented_stem}");
        return Ok(WriteOutcome::NegativeElement);
    }

    let paths = OutputPaths::new(config, augmented_stem);
    save_image(&result.image, &paths.image)?;
    if let Err(err) = write_label_file(&paths.label, &rows) {
        remove_partial(&[paths.image.as_path(), paths.label.as_path()]);
        return Err(err);
    }
    debug!(
        "wrote {} and {}",
        paths.image.display(),
        paths.label.display()
    );

    if need_save_bb_image {
        let drawn = draw::draw_boxes(&result.image, &rows);
        if let Err(err) = save_image(&drawn, &paths.bb_image) {
            remove_partial(&[paths.image.as_path(), paths.label.as_path()]);
            return Err(err);
        }
    }

    Ok(WriteOutcome::Written { boxes: rows.len() })
}

fn save_image(image: &RgbImage, path: &Path) -> Result<(), YoloaugError> {
    image.save(path).map_err(|source| YoloaugError::ImageWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Deletes files already written for a result that could not be completed.
fn remove_partial(paths: &[&Path]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => debug!("removed partial output {}", path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!("Failed to remove partial output {}: {err}", path.display()),
        }
    }
}
