//! Yoloaug: batch augmentation for YOLO object detection datasets.
//!
//! Every image in an input directory is run through a randomized pipeline of
//! geometric and photometric transforms. Its YOLO label file is transformed
//! alongside it, so the boxes keep matching the pixels. Results go to separate
//! output directories under a suffixed name.
//!
//! # Modules
//!
//! - [`label`]: YOLO label parsing, writing, and box representations
//! - [`augment`]: The augmentation pipeline and its individual transforms
//! - [`output`]: Result validation and persistence
//! - [`batch`]: Directory traversal and the per-image report
//! - [`config`]: YAML run configuration
//! - [`error`]: Error types for yoloaug operations

pub mod augment;
pub mod batch;
pub mod config;
pub mod error;
pub mod label;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use log::info;

pub use error::YoloaugError;

/// The yoloaug CLI application.
#[derive(Parser)]
#[command(name = "yoloaug")]
#[command(version, author, about)]
struct Cli {
    /// Path to the YAML config file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Also save a copy of each augmented image with its boxes drawn on it.
    #[arg(long, alias = "need_save_bb_image")]
    need_save_bb_image: bool,

    /// Only process the first `--test-num` entries.
    #[arg(long, alias = "is_test")]
    is_test: bool,

    /// Number of entries processed when `--is-test` is set.
    #[arg(long, alias = "test_num", default_value_t = 0)]
    test_num: usize,

    /// Skip files without a recognized image extension.
    #[arg(long)]
    images_only: bool,

    /// Seed the random generator for a reproducible run.
    #[arg(long, env = "YOLOAUG_SEED")]
    seed: Option<u64>,
}

/// Run the yoloaug CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`. Failures
/// of individual images are reported but do not make the run fail.
pub fn run() -> Result<(), YoloaugError> {
    let cli = Cli::parse();

    let config = config::Config::load(&cli.config)?;
    config.create_output_dirs(cli.need_save_bb_image)?;
    info!("Loaded config from {}", cli.config.display());

    let opts = batch::BatchOptions {
        need_save_bb_image: cli.need_save_bb_image,
        is_test: cli.is_test,
        test_num: cli.test_num,
        images_only: cli.images_only,
        seed: cli.seed,
        show_progress: true,
    };
    let report = batch::run_batch(&config, &opts)?;

    print!("{}", report);
    Ok(())
}
