//! Batch driver: augments every image in the input directory, one at a time.
//!
//! Per-image failures never abort the batch. They are logged and recorded in
//! the [`BatchReport`]; only problems with the input directory itself are
//! returned as errors.

mod report;

pub use report::{BatchReport, ImageOutcome};

use std::path::{Path, PathBuf};

use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use walkdir::WalkDir;

use crate::augment::Pipeline;
use crate::config::Config;
use crate::error::YoloaugError;
use crate::label::convert::to_augmentation_form;
use crate::label::io_yolo::{read_label_file, LABEL_EXTENSION};
use crate::output::{save_augmentation, WriteOutcome};

/// Extensions accepted by [`is_image_by_extension`].
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// Options that come from the command line rather than the config file.
#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    /// Also write box visualizations.
    pub need_save_bb_image: bool,
    /// Stop after `test_num` entries.
    pub is_test: bool,
    pub test_num: usize,
    /// Skip entries without a recognized image extension.
    pub images_only: bool,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
    /// Draw a progress bar on stderr.
    pub show_progress: bool,
}

impl BatchOptions {
    /// Number of entries a run will process out of `available`.
    pub fn planned_count(&self, available: usize) -> usize {
        if self.is_test {
            available.min(self.test_num)
        } else {
            available
        }
    }
}

/// Returns true if the file name has a recognized image extension.
pub fn is_image_by_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

/// Runs the whole batch and returns the per-image report.
pub fn run_batch(config: &Config, opts: &BatchOptions) -> Result<BatchReport, YoloaugError> {
    let entries = list_input_entries(&config.inp_img_pth, opts.images_only)?;
    let pipeline = Pipeline::new(config.augmentation.clone())?;

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let total = opts.planned_count(entries.len());
    let progress = progress_bar(total, opts.show_progress);

    let mut report = BatchReport::new();
    for (index, path) in entries.iter().take(total).enumerate() {
        let file_name = display_name(path);
        progress.set_message(file_name.clone());

        // The bar is cleared while this image logs.
        let outcome = progress.suspend(|| {
            info!("Processing image {}: {}", index + 1, file_name);
            process_image(path, config, &pipeline, opts.need_save_bb_image, &mut rng)
        });
        report.add(file_name, outcome);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(report)
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(total as u64);
    let template = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        progress.set_style(style);
    }
    progress
}

/// Augments one image, turning every error into a logged outcome.
pub fn process_image<R: Rng + ?Sized>(
    path: &Path,
    config: &Config,
    pipeline: &Pipeline,
    need_save_bb_image: bool,
    rng: &mut R,
) -> ImageOutcome {
    let file_name = display_name(path);

    match try_process_image(path, config, pipeline, need_save_bb_image, rng) {
        Ok(outcome) => outcome,
        Err(err @ (YoloaugError::ImageRead { .. } | YoloaugError::LabelRead { .. })) => {
            warn!("Skipping {file_name}: {err}");
            ImageOutcome::LoadFailed(err.to_string())
        }
        Err(err) => {
            warn!("Failed to augment {file_name}: {err}");
            ImageOutcome::Failed(err.to_string())
        }
    }
}

fn try_process_image<R: Rng + ?Sized>(
    path: &Path,
    config: &Config,
    pipeline: &Pipeline,
    need_save_bb_image: bool,
    rng: &mut R,
) -> Result<ImageOutcome, YoloaugError> {
    let file_name = display_name(path);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.clone());

    let image = load_image(path)?;
    let label_path = config
        .inp_lab_pth
        .join(format!("{stem}.{LABEL_EXTENSION}"));
    let labels = read_label_file(&label_path, &config.classes)?;
    if labels.is_empty() {
        return Ok(ImageOutcome::NoObjects);
    }

    let result = pipeline.apply(&image, to_augmentation_form(&labels), rng)?;

    let image_empty = result.image.width() == 0 || result.image.height() == 0;
    if image_empty || result.labels.is_empty() {
        if image_empty {
            warn!("Augmented image is empty for {file_name}");
        }
        if result.labels.is_empty() {
            warn!("Augmented label is empty for {file_name}");
        }
        return Ok(if image_empty {
            ImageOutcome::EmptyImage
        } else {
            ImageOutcome::EmptyLabels
        });
    }

    let augmented_stem = config.augmented_stem(&stem);
    let outcome = match save_augmentation(&result, &augmented_stem, config, need_save_bb_image)? {
        WriteOutcome::Written { boxes } => ImageOutcome::Written { boxes },
        WriteOutcome::EmptyLabels => ImageOutcome::EmptyLabels,
        WriteOutcome::NegativeElement => ImageOutcome::NegativeElement,
    };
    Ok(outcome)
}

fn load_image(path: &Path) -> Result<RgbImage, YoloaugError> {
    let image = image::open(path).map_err(|source| YoloaugError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.into_rgb8())
}

/// Lists the files directly inside `dir`, sorted by name.
fn list_input_entries(dir: &Path, images_only: bool) -> Result<Vec<PathBuf>, YoloaugError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| YoloaugError::InputDirRead {
            path: dir.to_path_buf(),
            message: source.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if images_only && !is_image_by_extension(entry.path()) {
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn image_extension_check_is_case_insensitive() {
        assert!(is_image_by_extension(Path::new("a.JPG")));
        assert!(is_image_by_extension(Path::new("dir/b.webp")));
        assert!(!is_image_by_extension(Path::new("c.txt")));
        assert!(!is_image_by_extension(Path::new("jpg")));
    }

    #[test]
    fn planned_count_respects_test_cap() {
        let full = BatchOptions::default();
        assert_eq!(full.planned_count(7), 7);

        let capped = BatchOptions {
            is_test: true,
            test_num: 3,
            ..BatchOptions::default()
        };
        assert_eq!(capped.planned_count(7), 3);
        assert_eq!(capped.planned_count(2), 2);
    }

    #[test]
    fn progress_bar_tracks_planned_length() {
        let bar = progress_bar(5, true);
        assert_eq!(bar.length(), Some(5));
        assert!(progress_bar(5, false).is_hidden());
    }

    #[test]
    fn list_input_entries_sorts_and_filters() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("b.png"), b"x").expect("write b");
        fs::write(temp.path().join("a.jpg"), b"x").expect("write a");
        fs::write(temp.path().join("notes.txt"), b"x").expect("write notes");
        fs::create_dir(temp.path().join("nested")).expect("create nested");
        fs::write(temp.path().join("nested/c.jpg"), b"x").expect("write c");

        let all = list_input_entries(temp.path(), false).expect("list");
        let names: Vec<String> = all.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "notes.txt"]);

        let images = list_input_entries(temp.path(), true).expect("list");
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn list_input_entries_fails_for_missing_dir() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = list_input_entries(&temp.path().join("missing"), false).unwrap_err();
        assert!(matches!(err, YoloaugError::InputDirRead { .. }));
    }
}
