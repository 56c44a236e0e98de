//! The augmentation pipeline.
//!
//! One call to [`Pipeline::apply`] runs a fixed sequence of steps over an
//! image and its boxes:
//!
//! 1. resize to the working resolution
//! 2. random crop
//! 3. horizontal flip
//! 4. brightness/contrast jitter
//! 5. CLAHE
//! 6. hue/saturation/value jitter
//! 7. sun flare in the upper part of the frame
//!
//! Only steps 1–3 move boxes. Each step draws its own randomness from the
//! caller's RNG, and nothing is retried: an error in any step is returned
//! as-is and the boxes that fail the visibility rule are simply gone.

pub mod clahe;
pub mod flare;
pub mod geometry;
pub mod photometric;

use image::{Rgb, RgbImage};
use log::debug;
use rand::Rng;
use serde::Deserialize;

use crate::error::YoloaugError;
use crate::label::{AugBox, AugmentedLabels};
use flare::FlareSettings;

/// Sizes, limits and probabilities for every pipeline step.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub resize_width: u32,
    pub resize_height: u32,
    pub crop_width: u32,
    pub crop_height: u32,
    pub flip_p: f64,
    pub brightness_limit: f64,
    pub contrast_limit: f64,
    pub brightness_contrast_p: f64,
    pub clahe_clip_limit: [f64; 2],
    pub clahe_tile_grid: u32,
    pub clahe_p: f64,
    pub hue_shift_limit: f64,
    pub sat_shift_limit: f64,
    pub val_shift_limit: f64,
    pub hsv_p: f64,
    pub flare_roi: [f64; 4],
    pub flare_angle: [f64; 2],
    pub flare_circles: [u32; 2],
    pub flare_src_radius: u32,
    pub flare_p: f64,
    /// Minimum fraction of a box's area that must stay visible.
    pub min_visibility: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resize_width: 1920,
            resize_height: 1080,
            crop_width: 960,
            crop_height: 960,
            flip_p: 0.5,
            brightness_limit: 0.3,
            contrast_limit: 0.3,
            brightness_contrast_p: 0.5,
            clahe_clip_limit: [0.0, 1.0],
            clahe_tile_grid: 8,
            clahe_p: 0.5,
            hue_shift_limit: 20.0,
            sat_shift_limit: 30.0,
            val_shift_limit: 20.0,
            hsv_p: 0.5,
            flare_roi: [0.0, 0.0, 1.0, 0.5],
            flare_angle: [0.0, 1.0],
            flare_circles: [3, 5],
            flare_src_radius: 100,
            flare_p: 0.25,
            min_visibility: 0.5,
        }
    }
}

impl PipelineConfig {
    /// A config whose only effect is resizing to `width x height`.
    pub fn resize_only(width: u32, height: u32) -> Self {
        Self {
            resize_width: width,
            resize_height: height,
            crop_width: width,
            crop_height: height,
            flip_p: 0.0,
            brightness_contrast_p: 0.0,
            clahe_p: 0.0,
            hsv_p: 0.0,
            flare_p: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), YoloaugError> {
        let probabilities = [
            ("flip_p", self.flip_p),
            ("brightness_contrast_p", self.brightness_contrast_p),
            ("clahe_p", self.clahe_p),
            ("hsv_p", self.hsv_p),
            ("flare_p", self.flare_p),
            ("min_visibility", self.min_visibility),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be in [0, 1], got {value}"));
            }
        }

        let limits = [
            ("brightness_limit", self.brightness_limit),
            ("contrast_limit", self.contrast_limit),
            ("hue_shift_limit", self.hue_shift_limit),
            ("sat_shift_limit", self.sat_shift_limit),
            ("val_shift_limit", self.val_shift_limit),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a non-negative number, got {value}"));
            }
        }

        if self.resize_width == 0 || self.resize_height == 0 {
            return invalid("resize size must be non-zero".to_string());
        }
        if self.crop_width == 0 || self.crop_height == 0 {
            return invalid("crop size must be non-zero".to_string());
        }
        if self.crop_width > self.resize_width || self.crop_height > self.resize_height {
            return invalid(format!(
                "crop {}x{} does not fit in resize {}x{}",
                self.crop_width, self.crop_height, self.resize_width, self.resize_height
            ));
        }

        let [clip_lo, clip_hi] = self.clahe_clip_limit;
        if !(0.0 <= clip_lo && clip_lo <= clip_hi && clip_hi.is_finite()) {
            return invalid(format!(
                "clahe_clip_limit must be an ordered non-negative range, got [{clip_lo}, {clip_hi}]"
            ));
        }
        if self.clahe_tile_grid == 0 {
            return invalid("clahe_tile_grid must be non-zero".to_string());
        }

        let [x_min, y_min, x_max, y_max] = self.flare_roi;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !(in_unit(x_min) && in_unit(y_min) && in_unit(x_max) && in_unit(y_max))
            || x_min > x_max
            || y_min > y_max
        {
            return invalid(format!("flare_roi is not a region of the unit frame: {:?}", self.flare_roi));
        }
        let [angle_lo, angle_hi] = self.flare_angle;
        if !(in_unit(angle_lo) && in_unit(angle_hi) && angle_lo <= angle_hi) {
            return invalid(format!("flare_angle must be an ordered range in [0, 1], got {:?}", self.flare_angle));
        }
        if self.flare_circles[0] > self.flare_circles[1] {
            return invalid(format!("flare_circles must be ordered, got {:?}", self.flare_circles));
        }

        Ok(())
    }

    fn flare_settings(&self) -> FlareSettings {
        FlareSettings {
            roi: self.flare_roi,
            angle: self.flare_angle,
            circles: self.flare_circles,
            src_radius: self.flare_src_radius,
            src_color: Rgb([255, 255, 255]),
        }
    }
}

fn invalid(message: String) -> Result<(), YoloaugError> {
    Err(YoloaugError::InvalidConfig { message })
}

/// The transformed image and the boxes that survived, produced together.
#[derive(Clone, Debug)]
pub struct AugmentationResult {
    pub image: RgbImage,
    pub labels: AugmentedLabels,
}

/// The fixed augmentation sequence, parameterized by [`PipelineConfig`].
#[derive(Clone, Debug)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Builds a pipeline after checking `config` with
    /// [`PipelineConfig::validate`].
    pub fn new(config: PipelineConfig) -> Result<Self, YoloaugError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs every step once over `image` and `boxes`.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        image: &RgbImage,
        boxes: Vec<AugBox>,
        rng: &mut R,
    ) -> Result<AugmentationResult, YoloaugError> {
        let cfg = &self.config;
        if image.width() == 0 || image.height() == 0 {
            return Err(YoloaugError::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }

        let (image, boxes) = geometry::resize(
            image,
            boxes,
            cfg.resize_width,
            cfg.resize_height,
            cfg.min_visibility,
        );

        let (mut image, mut boxes) = geometry::random_crop(
            &image,
            boxes,
            cfg.crop_width,
            cfg.crop_height,
            cfg.min_visibility,
            rng,
        )?;

        if rng.random_bool(cfg.flip_p) {
            debug!("horizontal flip");
            geometry::hflip(&mut image, &mut boxes);
        }

        if rng.random_bool(cfg.brightness_contrast_p) {
            let alpha = 1.0 + rng.random_range(-cfg.contrast_limit..=cfg.contrast_limit);
            let beta = rng.random_range(-cfg.brightness_limit..=cfg.brightness_limit);
            debug!("brightness/contrast alpha={alpha:.3} beta={beta:.3}");
            photometric::brightness_contrast(&mut image, alpha, beta);
        }

        if rng.random_bool(cfg.clahe_p) {
            let [lo, hi] = cfg.clahe_clip_limit;
            let clip_limit = rng.random_range(lo..=hi);
            debug!("clahe clip_limit={clip_limit:.3}");
            clahe::clahe(&mut image, clip_limit, cfg.clahe_tile_grid);
        }

        if rng.random_bool(cfg.hsv_p) {
            let hue = rng.random_range(-cfg.hue_shift_limit..=cfg.hue_shift_limit);
            let sat = rng.random_range(-cfg.sat_shift_limit..=cfg.sat_shift_limit);
            let val = rng.random_range(-cfg.val_shift_limit..=cfg.val_shift_limit);
            debug!("hsv shift hue={hue:.1} sat={sat:.1} val={val:.1}");
            photometric::shift_hsv(&mut image, hue, sat, val);
        }

        if rng.random_bool(cfg.flare_p) {
            let settings = cfg.flare_settings();
            let params = flare::sample_flare(image.width(), image.height(), &settings, rng);
            debug!("sun flare at {:?} with {} circle(s)", params.center, params.circles.len());
            flare::apply_flare(&mut image, &params, &settings);
        }

        Ok(AugmentationResult {
            image,
            labels: AugmentedLabels::from_boxes(boxes),
        })
    }
}
