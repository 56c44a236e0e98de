//! Per-object label records in the forms the pipeline passes around.

use super::YoloBox;

/// One parsed label line with its class resolved against the class list.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledBox {
    pub class_id: usize,
    pub class_name: String,
    pub bbox: YoloBox,
}

/// Augmentation form: geometry first, class carried as a trailing name.
#[derive(Clone, Debug, PartialEq)]
pub struct AugBox {
    pub bbox: YoloBox,
    pub class_name: String,
}

impl AugBox {
    pub fn new(bbox: YoloBox, class_name: impl Into<String>) -> Self {
        Self {
            bbox,
            class_name: class_name.into(),
        }
    }
}

/// Storage form: leading integer class index followed by `cx cy w h`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StorageRow {
    pub class_id: usize,
    pub bbox: YoloBox,
}

impl StorageRow {
    /// Returns true if any numeric field is negative.
    pub fn has_negative(&self) -> bool {
        self.bbox.values().iter().any(|v| *v < 0.0)
    }
}
