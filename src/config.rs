//! Run configuration loaded from YAML.
//!
//! ```yaml
//! inp_img_pth: data/images
//! inp_lab_pth: data/labels
//! out_img_pth: out/images
//! out_lab_pth: out/labels
//! CLASSES: [car, bus, truck]
//! transformed_file_name: aug
//! ```
//!
//! `bb_img_pth` and an `augmentation:` section are optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::augment::PipelineConfig;
use crate::error::YoloaugError;

/// Configuration constructed once at startup and passed to every stage.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub inp_img_pth: PathBuf,
    pub inp_lab_pth: PathBuf,
    pub out_img_pth: PathBuf,
    pub out_lab_pth: PathBuf,
    /// Ordered class names; the index is the class id.
    #[serde(rename = "CLASSES")]
    pub classes: Vec<String>,
    /// Suffix appended to each output stem as `<stem>_<suffix>`.
    pub transformed_file_name: String,
    /// Directory for box visualization images.
    #[serde(default = "default_bb_img_pth")]
    pub bb_img_pth: PathBuf,
    #[serde(default)]
    pub augmentation: PipelineConfig,
}

fn default_bb_img_pth() -> PathBuf {
    PathBuf::from("bb_image")
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, YoloaugError> {
        let data = fs::read_to_string(path).map_err(|source| YoloaugError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_yaml::from_str(&data).map_err(|source| YoloaugError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), YoloaugError> {
        if self.classes.is_empty() {
            return Err(YoloaugError::InvalidConfig {
                message: "CLASSES must list at least one class".to_string(),
            });
        }
        if let Some(name) = self.classes.iter().find(|name| name.trim().is_empty()) {
            return Err(YoloaugError::InvalidConfig {
                message: format!("CLASSES contains an empty name '{name}'"),
            });
        }
        for (index, name) in self.classes.iter().enumerate() {
            if self.classes[..index].contains(name) {
                return Err(YoloaugError::InvalidConfig {
                    message: format!("CLASSES lists '{name}' more than once"),
                });
            }
        }
        self.augmentation.validate()
    }

    /// Creates the output directories, plus the visualization directory when
    /// `with_bb_images` is set.
    pub fn create_output_dirs(&self, with_bb_images: bool) -> Result<(), YoloaugError> {
        let mut dirs = vec![&self.out_img_pth, &self.out_lab_pth];
        if with_bb_images {
            dirs.push(&self.bb_img_pth);
        }

        for dir in dirs {
            fs::create_dir_all(dir).map_err(|source| YoloaugError::OutputDirCreate {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Output stem for an input file stem.
    pub fn augmented_stem(&self, stem: &str) -> String {
        format!("{}_{}", stem, self.transformed_file_name)
    }
}
