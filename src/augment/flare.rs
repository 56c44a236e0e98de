//! Synthetic sun flare overlay.
//!
//! A flare source is placed at a random point inside a region of interest
//! (by default the upper half of the frame). A few translucent circles are
//! scattered along a random line through the source, then the source itself
//! is drawn as concentric discs with a cubic alpha falloff.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use rand::Rng;

use super::photometric::to_u8;

/// Flare parameters drawn once per application.
#[derive(Clone, Debug, PartialEq)]
pub struct FlareParams {
    pub center: (i32, i32),
    pub circles: Vec<FlareCircle>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlareCircle {
    pub alpha: f32,
    pub center: (i32, i32),
    pub radius: i32,
    pub color: Rgb<u8>,
}

/// Flare drawing settings taken from the pipeline config.
#[derive(Clone, Copy, Debug)]
pub struct FlareSettings {
    /// `(x_min, y_min, x_max, y_max)` as fractions of the frame.
    pub roi: [f64; 4],
    /// Angle range as fractions of a full turn.
    pub angle: [f64; 2],
    pub circles: [u32; 2],
    pub src_radius: u32,
    pub src_color: Rgb<u8>,
}

/// Samples the flare source, line angle and circles for an image.
pub fn sample_flare<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    settings: &FlareSettings,
    rng: &mut R,
) -> FlareParams {
    let [x_min, y_min, x_max, y_max] = settings.roi;
    let angle = std::f64::consts::TAU * rng.random_range(settings.angle[0]..=settings.angle[1]);
    let center_x = (width as f64 * rng.random_range(x_min..=x_max)) as i32;
    let center_y = (height as f64 * rng.random_range(y_min..=y_max)) as i32;

    // Candidate circle positions every 10 px along the flare line.
    let points: Vec<(i32, i32)> = (-center_x..width as i32 - center_x)
        .step_by(10)
        .map(|t| {
            let t = t as f64;
            (
                (center_x as f64 + t * angle.cos()) as i32,
                (center_y as f64 + t * angle.sin()) as i32,
            )
        })
        .collect();

    let count = rng.random_range(settings.circles[0]..=settings.circles[1]);
    let max_rad = ((height / 100) as i32 - 2).max(2);
    let mut circles = Vec::with_capacity(count as usize);

    if !points.is_empty() {
        for _ in 0..count {
            let alpha = rng.random_range(0.05f32..0.2);
            let center = points[rng.random_range(0..points.len())];
            let rad = rng.random_range(1..=max_rad);
            let color = Rgb(settings.src_color.0.map(|c| {
                let low = c.saturating_sub(50);
                rng.random_range(low..=c)
            }));
            circles.push(FlareCircle {
                alpha,
                center,
                radius: rad.pow(3),
                color,
            });
        }
    }

    FlareParams {
        center: (center_x, center_y),
        circles,
    }
}

/// Draws sampled flare circles and the flare source onto `image`.
pub fn apply_flare(image: &mut RgbImage, params: &FlareParams, settings: &FlareSettings) {
    let mut overlay = image.clone();
    for circle in &params.circles {
        draw_filled_circle_mut(&mut overlay, circle.center, circle.radius, circle.color);
        blend(image, &overlay, circle.alpha);
    }

    let steps = (settings.src_radius / 10).max(1) as usize;
    let mut overlay = image.clone();
    for i in 0..steps {
        let radius = lerp(1.0, settings.src_radius as f32, i, steps) as i32;
        let a = lerp(0.0, 1.0, steps - i - 1, steps);
        draw_filled_circle_mut(&mut overlay, params.center, radius, settings.src_color);
        blend(image, &overlay, a * a * a);
    }
}

/// `i`-th of `n` evenly spaced values from `start` to `end` inclusive.
fn lerp(start: f32, end: f32, i: usize, n: usize) -> f32 {
    if n <= 1 {
        return end;
    }
    start + (end - start) * i as f32 / (n - 1) as f32
}

/// `output = overlay * alpha + output * (1 - alpha)`.
fn blend(output: &mut RgbImage, overlay: &RgbImage, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let alpha = alpha as f64;
    for (out, over) in output.pixels_mut().zip(overlay.pixels()) {
        for (o, v) in out.0.iter_mut().zip(over.0.iter()) {
            *o = to_u8(*v as f64 * alpha + *o as f64 * (1.0 - alpha));
        }
    }
}
