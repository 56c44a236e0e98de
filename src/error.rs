use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yoloaug operations.
#[derive(Debug, Error)]
pub enum YoloaugError {
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read label file {path}: {source}")]
    LabelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse label file {path} at line {line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Class index {index} in {path} at line {line} is out of range for {class_count} class(es)")]
    ClassIndexOutOfRange {
        path: PathBuf,
        line: usize,
        index: usize,
        class_count: usize,
    },

    #[error("Class name '{name}' is not in the configured class list")]
    UnknownClassName { name: String },

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write label file {path}: {source}")]
    LabelWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image has zero size ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Crop size {crop_width}x{crop_height} is larger than image size {width}x{height}")]
    CropTooLarge {
        crop_width: u32,
        crop_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Failed while traversing {path}: {message}")]
    InputDirRead { path: PathBuf, message: String },
}
