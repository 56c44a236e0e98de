//! Label types and YOLO label file handling.
//!
//! Boxes are kept as normalized center/size ([`YoloBox`]) and only expanded
//! to corner form ([`BBoxXYXY`]) where geometry needs it. The
//! [`Pixel`]/[`Normalized`] markers keep the two spaces apart at compile
//! time.

mod bbox;
pub mod convert;
pub mod io_yolo;
mod model;
mod space;

pub use bbox::{BBoxXYXY, YoloBox};
pub use convert::AugmentedLabels;
pub use model::{AugBox, LabeledBox, StorageRow};
pub use space::{Normalized, Pixel};
