//! Contrast-limited adaptive histogram equalization on the luma channel.
//!
//! The image is split into a `grid x grid` tile layout. Each tile gets an
//! equalization lookup table built from its clipped histogram, and every
//! pixel is mapped through a bilinear blend of the four nearest tile tables.
//! Only luma changes: each channel is shifted by the luma delta, which leaves
//! the Cb/Cr chroma components untouched.

use image::RgbImage;

use super::photometric::to_u8;

const BINS: usize = 256;

/// Applies CLAHE with the given clip limit (histogram-relative, `0` disables
/// clipping) and tile grid size.
pub fn clahe(image: &mut RgbImage, clip_limit: f64, grid: u32) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || grid == 0 {
        return;
    }

    let luma: Vec<u8> = image
        .pixels()
        .map(|p| to_u8(0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64))
        .collect();

    let tiles = TileGrid::new(width, height, grid);
    let luts = tiles.build_luts(&luma, width, clip_limit);

    for (index, pixel) in image.pixels_mut().enumerate() {
        let x = index as u32 % width;
        let y = index as u32 / width;
        let old = luma[index];
        let new = tiles.interpolate(&luts, x, y, old);
        let delta = new as f64 - old as f64;
        for channel in pixel.0.iter_mut() {
            *channel = to_u8(*channel as f64 + delta);
        }
    }
}

struct TileGrid {
    cols: u32,
    rows: u32,
    tile_w: f64,
    tile_h: f64,
    width: u32,
    height: u32,
}

impl TileGrid {
    fn new(width: u32, height: u32, grid: u32) -> Self {
        let cols = grid.min(width);
        let rows = grid.min(height);
        Self {
            cols,
            rows,
            tile_w: width as f64 / cols as f64,
            tile_h: height as f64 / rows as f64,
            width,
            height,
        }
    }

    fn x_range(&self, col: u32) -> (u32, u32) {
        (col * self.width / self.cols, (col + 1) * self.width / self.cols)
    }

    fn y_range(&self, row: u32) -> (u32, u32) {
        (row * self.height / self.rows, (row + 1) * self.height / self.rows)
    }

    fn build_luts(&self, luma: &[u8], stride: u32, clip_limit: f64) -> Vec<[u8; BINS]> {
        let mut luts = Vec::with_capacity((self.cols * self.rows) as usize);

        for row in 0..self.rows {
            let (y0, y1) = self.y_range(row);
            for col in 0..self.cols {
                let (x0, x1) = self.x_range(col);

                let mut hist = [0u32; BINS];
                for y in y0..y1 {
                    let start = (y * stride + x0) as usize;
                    let end = (y * stride + x1) as usize;
                    for value in &luma[start..end] {
                        hist[*value as usize] += 1;
                    }
                }

                let area = (x1 - x0) * (y1 - y0);
                if clip_limit > 0.0 {
                    let limit = ((clip_limit * area as f64 / BINS as f64) as u32).max(1);
                    clip_histogram(&mut hist, limit);
                }
                luts.push(equalization_lut(&hist, area));
            }
        }

        luts
    }

    fn interpolate(&self, luts: &[[u8; BINS]], x: u32, y: u32, value: u8) -> u8 {
        let (c0, c1, fx) = neighbours(x, self.tile_w, self.cols);
        let (r0, r1, fy) = neighbours(y, self.tile_h, self.rows);
        let v = value as usize;
        let at = |r: u32, c: u32| luts[(r * self.cols + c) as usize][v] as f64;

        let top = (1.0 - fx) * at(r0, c0) + fx * at(r0, c1);
        let bottom = (1.0 - fx) * at(r1, c0) + fx * at(r1, c1);
        to_u8((1.0 - fy) * top + fy * bottom)
    }
}

/// Nearest two tile indices along one axis and the blend weight of the second.
fn neighbours(pos: u32, tile_size: f64, count: u32) -> (u32, u32, f64) {
    let t = (pos as f64 + 0.5) / tile_size - 0.5;
    let lower = t.floor();
    let frac = t - lower;
    let last = (count - 1) as f64;
    let first = lower.clamp(0.0, last) as u32;
    let second = (lower + 1.0).clamp(0.0, last) as u32;
    (first, second, frac)
}

/// Clips every bin to `limit` and spreads the excess evenly over all bins.
fn clip_histogram(hist: &mut [u32; BINS], limit: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    let per_bin = excess / BINS as u32;
    let residual = (excess % BINS as u32) as usize;
    for bin in hist.iter_mut() {
        *bin += per_bin;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        for bin in hist.iter_mut().step_by(step).take(residual) {
            *bin += 1;
        }
    }
}

fn equalization_lut(hist: &[u32; BINS], area: u32) -> [u8; BINS] {
    let mut lut = [0u8; BINS];
    if area == 0 {
        return lut;
    }

    let scale = (BINS - 1) as f64 / area as f64;
    let mut cumulative = 0u32;
    for (out, count) in lut.iter_mut().zip(hist.iter()) {
        cumulative += count;
        *out = to_u8(cumulative as f64 * scale);
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn clip_histogram_preserves_total_count() {
        let mut hist = [0u32; BINS];
        hist[10] = 500;
        hist[200] = 37;
        clip_histogram(&mut hist, 4);

        assert_eq!(hist.iter().sum::<u32>(), 537);
        assert!(hist.iter().all(|count| *count <= 4 + 3));
    }

    #[test]
    fn equalization_lut_is_monotonic() {
        let mut hist = [0u32; BINS];
        hist[50] = 10;
        hist[60] = 30;
        let lut = equalization_lut(&hist, 40);

        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(lut[255], 255);
        assert_eq!(lut[50], to_u8(10.0 * 255.0 / 40.0));
    }

    #[test]
    fn clahe_stretches_low_contrast_image() {
        let mut image = RgbImage::from_fn(64, 64, |x, _| {
            let v = 100 + (x % 8) as u8;
            Rgb([v, v, v])
        });
        let before = spread(&image);

        clahe(&mut image, 0.0, 8);

        assert!(spread(&image) > before);
    }

    #[test]
    fn clahe_keeps_uniform_image_uniform() {
        let mut image = RgbImage::from_pixel(16, 16, Rgb([90, 90, 90]));
        clahe(&mut image, 1.0, 8);

        let first = *image.get_pixel(0, 0);
        assert!(image.pixels().all(|p| *p == first));
    }

    #[test]
    fn clahe_handles_images_smaller_than_grid() {
        let mut image = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        clahe(&mut image, 1.0, 8);
        assert_eq!(image.dimensions(), (3, 2));
    }

    fn spread(image: &RgbImage) -> u8 {
        let values: Vec<u8> = image.pixels().map(|p| p[0]).collect();
        values.iter().max().copied().unwrap_or(0) - values.iter().min().copied().unwrap_or(0)
    }
}
