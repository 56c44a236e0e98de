//! Coordinate space marker types.
//!
//! Zero-sized type parameters that keep pixel-space and normalized boxes
//! from being mixed up while a box moves through the pipeline.

use std::fmt;

/// Marker for absolute pixel coordinates in the current working image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker for coordinates normalized to `[0, 1]` by image width/height.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
