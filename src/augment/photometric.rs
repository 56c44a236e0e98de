//! Pixel-value steps. None of these touch box geometry.

use image::RgbImage;

/// `out = clamp(in * alpha + beta * 255)` on every channel.
pub fn brightness_contrast(image: &mut RgbImage, alpha: f64, beta: f64) {
    let mut lut = [0u8; 256];
    for (value, out) in lut.iter_mut().enumerate() {
        *out = to_u8(value as f64 * alpha + beta * 255.0);
    }

    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = lut[*channel as usize];
        }
    }
}

/// Shifts hue (OpenCV half-degree units, so `hue_shift = 20` is 40°) and
/// saturation/value (0–255 scale).
pub fn shift_hsv(image: &mut RgbImage, hue_shift: f64, sat_shift: f64, val_shift: f64) {
    let hue_degrees = hue_shift * 2.0;

    for pixel in image.pixels_mut() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);

        let h = (h + hue_degrees).rem_euclid(360.0);
        let s = ((s * 255.0 + sat_shift).clamp(0.0, 255.0)) / 255.0;
        let v = ((v * 255.0 + val_shift).clamp(0.0, 255.0)) / 255.0;

        pixel.0 = hsv_to_rgb(h, s, v);
    }
}

/// Returns `(hue in degrees, saturation in [0, 1], value in [0, 1])`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    (h, s, max)
}

pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let c = v * s;
    let sector = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [
        to_u8((r + m) * 255.0),
        to_u8((g + m) * 255.0),
        to_u8((b + m) * 255.0),
    ]
}

#[inline]
pub(crate) fn to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
