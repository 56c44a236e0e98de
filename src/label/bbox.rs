//! Box geometry: YOLO center/size boxes and corner-form boxes.

use std::marker::PhantomData;

use super::{Normalized, Pixel};

/// A normalized YOLO box: center and size as fractions of the image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YoloBox {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl YoloBox {
    #[inline]
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self { cx, cy, w, h }
    }

    /// Clamps the box so its extent lies inside the unit frame.
    ///
    /// Size is clamped to `[0, 1]` first, then each center to
    /// `[size / 2, 1 - size / 2]` using the clamped size, so the result
    /// always satisfies the invariant for finite input.
    pub fn clamped(&self) -> Self {
        let w = self.w.clamp(0.0, 1.0);
        let h = self.h.clamp(0.0, 1.0);
        Self {
            cx: self.cx.clamp(w / 2.0, 1.0 - w / 2.0),
            cy: self.cy.clamp(h / 2.0, 1.0 - h / 2.0),
            w,
            h,
        }
    }

    /// Returns true if the box already satisfies the unit-frame invariant.
    pub fn is_within_unit_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.w)
            && (0.0..=1.0).contains(&self.h)
            && self.cx >= self.w / 2.0
            && self.cx <= 1.0 - self.w / 2.0
            && self.cy >= self.h / 2.0
            && self.cy <= 1.0 - self.h / 2.0
    }

    /// Values in storage order (`cx cy w h`).
    #[inline]
    pub fn values(&self) -> [f64; 4] {
        [self.cx, self.cy, self.w, self.h]
    }

    pub fn to_xyxy(&self) -> BBoxXYXY<Normalized> {
        BBoxXYXY::from_cxcywh(self.cx, self.cy, self.w, self.h)
    }
}

/// An axis-aligned box in corner form (xmin, ymin, xmax, ymax).
///
/// The constructor does not enforce `min <= max`; [`BBoxXYXY::intersect`]
/// reports an empty intersection as `None` instead.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            _space: PhantomData,
        }
    }

    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self::from_xyxy(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Area of the box; zero for degenerate or inverted boxes.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Returns `(cx, cy, w, h)`.
    pub fn to_cxcywh(&self) -> (f64, f64, f64, f64) {
        (
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
            self.width(),
            self.height(),
        )
    }

    /// Intersection with `other`, or `None` when they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let xmin = self.xmin.max(other.xmin);
        let ymin = self.ymin.max(other.ymin);
        let xmax = self.xmax.min(other.xmax);
        let ymax = self.ymax.min(other.ymax);

        if xmin < xmax && ymin < ymax {
            Some(Self::from_xyxy(xmin, ymin, xmax, ymax))
        } else {
            None
        }
    }

    /// Shifts the box by `(-dx, -dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::from_xyxy(self.xmin - dx, self.ymin - dy, self.xmax - dx, self.ymax - dy)
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.xmin)
            .field("ymin", &self.ymin)
            .field("xmax", &self.xmax)
            .field("ymax", &self.ymax)
            .finish()
    }
}

impl BBoxXYXY<Normalized> {
    /// Expands normalized corners to pixel corners for an image of the given size.
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY::from_xyxy(
            self.xmin * image_width,
            self.ymin * image_height,
            self.xmax * image_width,
            self.ymax * image_height,
        )
    }

    pub fn to_yolo(&self) -> YoloBox {
        let (cx, cy, w, h) = self.to_cxcywh();
        YoloBox::new(cx, cy, w, h)
    }
}

impl BBoxXYXY<Pixel> {
    pub fn to_normalized(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Normalized> {
        BBoxXYXY::from_xyxy(
            self.xmin / image_width,
            self.ymin / image_height,
            self.xmax / image_width,
            self.ymax / image_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_pulls_center_inside_frame() {
        let clamped = YoloBox::new(0.95, 0.02, 0.2, 0.1).clamped();
        assert!((clamped.cx - 0.9).abs() < 1e-12);
        assert!((clamped.cy - 0.05).abs() < 1e-12);
        assert_eq!(clamped.w, 0.2);
        assert_eq!(clamped.h, 0.1);
    }

    #[test]
    fn clamped_handles_oversized_and_negative_sizes() {
        let clamped = YoloBox::new(0.9, 0.3, 1.5, -0.4).clamped();
        assert_eq!(clamped.w, 1.0);
        assert_eq!(clamped.h, 0.0);
        assert_eq!(clamped.cx, 0.5);
        assert_eq!(clamped.cy, 0.3);
        assert!(clamped.is_within_unit_frame());
    }

    #[test]
    fn cxcywh_corner_conversion() {
        let bbox: BBoxXYXY<Normalized> = BBoxXYXY::from_cxcywh(0.5, 0.5, 0.2, 0.4);
        assert!((bbox.xmin - 0.4).abs() < 1e-12);
        assert!((bbox.ymin - 0.3).abs() < 1e-12);
        assert!((bbox.xmax - 0.6).abs() < 1e-12);
        assert!((bbox.ymax - 0.7).abs() < 1e-12);

        let yolo = bbox.to_yolo();
        assert!((yolo.cx - 0.5).abs() < 1e-12);
        assert!((yolo.h - 0.4).abs() < 1e-12);
    }

    #[test]
    fn intersect_clips_and_detects_disjoint_boxes() {
        let a: BBoxXYXY<Pixel> = BBoxXYXY::from_xyxy(0.0, 0.0, 10.0, 10.0);
        let b: BBoxXYXY<Pixel> = BBoxXYXY::from_xyxy(5.0, 5.0, 20.0, 20.0);
        let c: BBoxXYXY<Pixel> = BBoxXYXY::from_xyxy(10.0, 0.0, 20.0, 10.0);

        let inter = a.intersect(&b).expect("boxes overlap");
        assert_eq!(inter.area(), 25.0);
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn pixel_normalized_roundtrip() {
        let norm: BBoxXYXY<Normalized> = BBoxXYXY::from_xyxy(0.25, 0.5, 0.75, 1.0);
        let px = norm.to_pixel(200.0, 100.0);
        assert_eq!(px.xmin, 50.0);
        assert_eq!(px.ymax, 100.0);
        assert_eq!(px.to_normalized(200.0, 100.0), norm);
    }
}
