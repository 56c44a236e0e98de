//! Box visualization for inspecting augmented output.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::label::StorageRow;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Returns a copy of `image` with every row drawn as a 1 px rectangle.
pub fn draw_boxes(image: &RgbImage, rows: &[StorageRow]) -> RgbImage {
    let mut canvas = image.clone();
    let (width, height) = (image.width() as f64, image.height() as f64);

    for row in rows {
        let px = row.bbox.to_xyxy().to_pixel(width, height);
        let x0 = px.xmin.round() as i32;
        let y0 = px.ymin.round() as i32;
        let x1 = px.xmax.round() as i32;
        let y1 = px.ymax.round() as i32;

        let rect = Rect::at(x0, y0).of_size((x1 - x0).max(1) as u32, (y1 - y0).max(1) as u32);
        draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::YoloBox;

    #[test]
    fn draws_outline_at_pixel_corners() {
        let image = RgbImage::new(100, 50);
        let rows = [StorageRow {
            class_id: 0,
            bbox: YoloBox::new(0.5, 0.5, 0.2, 0.4),
        }];

        let drawn = draw_boxes(&image, &rows);

        // Corners (40, 15)-(60, 35).
        assert_eq!(*drawn.get_pixel(40, 15), BOX_COLOR);
        assert_eq!(*drawn.get_pixel(50, 15), BOX_COLOR);
        assert_eq!(*drawn.get_pixel(40, 25), BOX_COLOR);
        assert_eq!(*drawn.get_pixel(50, 25), Rgb([0, 0, 0]));
        // The source image is untouched.
        assert_eq!(*image.get_pixel(40, 15), Rgb([0, 0, 0]));
    }
}
