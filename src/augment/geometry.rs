//! Geometric steps: resize, crop and horizontal flip.
//!
//! Every step transforms pixels and boxes together and then applies the
//! visibility rule: a box whose clipped area is below `min_visibility` of its
//! area before the step is dropped. Degenerate (zero-area) boxes never
//! survive a geometric step.

use image::imageops::{self, FilterType};
use image::RgbImage;
use log::debug;
use rand::Rng;

use crate::error::YoloaugError;
use crate::label::{AugBox, BBoxXYXY, Pixel};

/// Returns true if a box keeps enough of its area to stay in the label set.
pub fn is_visible(area_before: f64, area_after: f64, min_visibility: f64) -> bool {
    area_before > 0.0 && area_after >= min_visibility * area_before
}

/// Bilinear resize to a fixed size.
///
/// Normalized boxes are unchanged by scaling; the visibility pass only
/// removes degenerate boxes.
pub fn resize(
    image: &RgbImage,
    boxes: Vec<AugBox>,
    width: u32,
    height: u32,
    min_visibility: f64,
) -> (RgbImage, Vec<AugBox>) {
    let resized = imageops::resize(image, width, height, FilterType::Triangle);

    let boxes = boxes
        .into_iter()
        .filter(|aug| {
            let area = aug.bbox.w * width as f64 * aug.bbox.h * height as f64;
            let keep = is_visible(area, area, min_visibility);
            if !keep {
                debug!("dropping degenerate '{}' box {:?}", aug.class_name, aug.bbox);
            }
            keep
        })
        .collect();

    (resized, boxes)
}

/// Crops a `width x height` window at a uniformly drawn integer offset.
pub fn random_crop<R: Rng + ?Sized>(
    image: &RgbImage,
    boxes: Vec<AugBox>,
    width: u32,
    height: u32,
    min_visibility: f64,
    rng: &mut R,
) -> Result<(RgbImage, Vec<AugBox>), YoloaugError> {
    check_crop_fits(image, width, height)?;

    let x0 = rng.random_range(0..=image.width() - width);
    let y0 = rng.random_range(0..=image.height() - height);

    crop(image, boxes, x0, y0, width, height, min_visibility)
}

/// Crops the window with top-left corner `(x0, y0)`.
///
/// Boxes entirely outside the window are dropped, boxes partially outside
/// are clipped to it and then subject to the visibility rule.
pub fn crop(
    image: &RgbImage,
    boxes: Vec<AugBox>,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    min_visibility: f64,
) -> Result<(RgbImage, Vec<AugBox>), YoloaugError> {
    check_crop_fits(image, width, height)?;
    let x_end = x0.checked_add(width).filter(|end| *end <= image.width());
    let y_end = y0.checked_add(height).filter(|end| *end <= image.height());
    if x_end.is_none() || y_end.is_none() {
        return Err(YoloaugError::CropTooLarge {
            crop_width: x0.saturating_add(width),
            crop_height: y0.saturating_add(height),
            width: image.width(),
            height: image.height(),
        });
    }

    let (img_w, img_h) = (image.width() as f64, image.height() as f64);
    let (x0f, y0f) = (x0 as f64, y0 as f64);
    let window: BBoxXYXY<Pixel> =
        BBoxXYXY::from_xyxy(x0f, y0f, x0f + width as f64, y0f + height as f64);

    let mut kept = Vec::with_capacity(boxes.len());
    for aug in boxes {
        let px = aug.bbox.to_xyxy().to_pixel(img_w, img_h);
        let Some(clipped) = px.intersect(&window) else {
            debug!("dropping '{}' box outside crop window", aug.class_name);
            continue;
        };

        if !is_visible(px.area(), clipped.area(), min_visibility) {
            debug!(
                "dropping '{}' box with {:.1}% visible area",
                aug.class_name,
                100.0 * clipped.area() / px.area()
            );
            continue;
        }

        let bbox = clipped
            .translated(x0f, y0f)
            .to_normalized(width as f64, height as f64)
            .to_yolo();
        kept.push(AugBox { bbox, ..aug });
    }

    let cropped = imageops::crop_imm(image, x0, y0, width, height).to_image();
    Ok((cropped, kept))
}

/// Mirrors the image left-to-right; `cx` becomes `1 - cx`.
pub fn hflip(image: &mut RgbImage, boxes: &mut [AugBox]) {
    imageops::flip_horizontal_in_place(image);
    for aug in boxes.iter_mut() {
        aug.bbox.cx = 1.0 - aug.bbox.cx;
    }
}

fn check_crop_fits(image: &RgbImage, width: u32, height: u32) -> Result<(), YoloaugError> {
    if width == 0 || height == 0 || width > image.width() || height > image.height() {
        return Err(YoloaugError::CropTooLarge {
            crop_width: width,
            crop_height: height,
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}
