#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

/// Augmentation section that only resizes to `width x height`.
pub fn resize_only_section(width: u32, height: u32) -> String {
    format!(
        "augmentation:
  resize_width: {width}
  resize_height: {height}
  crop_width: {width}
  crop_height: {height}
  flip_p: 0.0
  brightness_contrast_p: 0.0
  clahe_p: 0.0
  hsv_p: 0.0
  flare_p: 0.0
"
    )
}

/// Input and output directories for one run, rooted in a temp dir.
pub struct Workspace {
    pub root: PathBuf,
    pub images: PathBuf,
    pub labels: PathBuf,
    pub out_images: PathBuf,
    pub out_labels: PathBuf,
    pub bb_images: PathBuf,
    pub config: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path) -> Self {
        let ws = Self {
            root: root.to_path_buf(),
            images: root.join("input/images"),
            labels: root.join("input/labels"),
            out_images: root.join("output/images"),
            out_labels: root.join("output/labels"),
            bb_images: root.join("output/bb_image"),
            config: root.join("config.yaml"),
        };
        fs::create_dir_all(&ws.images).expect("create image dir");
        fs::create_dir_all(&ws.labels).expect("create label dir");
        ws
    }

    /// Writes `config.yaml` with classes `car`, `bus`, `truck` plus `extra`.
    pub fn write_config(&self, extra: &str) {
        let yaml = format!(
            "inp_img_pth: '{}'
inp_lab_pth: '{}'
out_img_pth: '{}'
out_lab_pth: '{}'
bb_img_pth: '{}'
CLASSES:
  - car
  - bus
  - truck
transformed_file_name: aug
{extra}",
            self.images.display(),
            self.labels.display(),
            self.out_images.display(),
            self.out_labels.display(),
            self.bb_images.display(),
        );
        fs::write(&self.config, yaml).expect("write config");
    }

    /// Writes a PNG input image with a simple gradient.
    pub fn add_image(&self, file_name: &str, width: u32, height: u32) {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        image
            .save(self.images.join(file_name))
            .expect("write input image");
    }

    pub fn add_label(&self, stem: &str, content: &str) {
        fs::write(self.labels.join(format!("{stem}.txt")), content).expect("write label");
    }

    pub fn read_output_label(&self, stem: &str) -> String {
        fs::read_to_string(self.out_labels.join(format!("{stem}_aug.txt")))
            .expect("read output label")
    }

    pub fn output_image(&self, stem: &str) -> PathBuf {
        self.out_images.join(format!("{stem}_aug.jpg"))
    }

    pub fn output_file_count(&self) -> usize {
        count_files(&self.out_images) + count_files(&self.out_labels)
    }
}

fn count_files(dir: &Path) -> usize {
    match fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

/// Parses a written label line into its five numbers.
pub fn parse_line(line: &str) -> (usize, [f64; 4]) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(parts.len(), 5, "unexpected label line: {line}");
    let class_id = parts[0].parse().expect("class index");
    let mut values = [0.0; 4];
    for (slot, text) in values.iter_mut().zip(&parts[1..]) {
        *slot = text.parse().expect("coordinate");
    }
    (class_id, values)
}
