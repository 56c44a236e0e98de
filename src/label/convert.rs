//! Conversion between storage form and augmentation form.
//!
//! Storage form leads with the integer class index (`class cx cy w h`), the
//! augmentation form trails with the class name (`cx cy w h name`). The
//! pipeline's output shape is decided once, as an [`AugmentedLabels`]
//! variant, and both shapes share the same per-box conversion.

use super::{AugBox, LabeledBox, StorageRow};
use crate::error::YoloaugError;

/// Boxes that survived augmentation, tagged by shape.
#[derive(Clone, Debug, PartialEq)]
pub enum AugmentedLabels {
    Empty,
    Single(AugBox),
    Multi(Vec<AugBox>),
}

impl AugmentedLabels {
    pub fn from_boxes(mut boxes: Vec<AugBox>) -> Self {
        match boxes.len() {
            0 => Self::Empty,
            1 => Self::Single(boxes.remove(0)),
            _ => Self::Multi(boxes),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Multi(boxes) => boxes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[AugBox] {
        match self {
            Self::Empty => &[],
            Self::Single(bbox) => std::slice::from_ref(bbox),
            Self::Multi(boxes) => boxes,
        }
    }
}

/// Storage → augmentation form.
pub fn to_augmentation_form(boxes: &[LabeledBox]) -> Vec<AugBox> {
    boxes
        .iter()
        .map(|labeled| AugBox::new(labeled.bbox, labeled.class_name.clone()))
        .collect()
}

/// Augmentation → storage form, resolving class names through `classes`.
pub fn to_storage_form(
    labels: &AugmentedLabels,
    classes: &[String],
) -> Result<Vec<StorageRow>, YoloaugError> {
    match labels {
        AugmentedLabels::Empty => Ok(Vec::new()),
        AugmentedLabels::Single(aug) => Ok(vec![storage_row(aug, classes)?]),
        AugmentedLabels::Multi(boxes) => boxes
            .iter()
            .map(|aug| storage_row(aug, classes))
            .collect(),
    }
}

fn storage_row(aug: &AugBox, classes: &[String]) -> Result<StorageRow, YoloaugError> {
    let class_id = classes
        .iter()
        .position(|name| *name == aug.class_name)
        .ok_or_else(|| YoloaugError::UnknownClassName {
            name: aug.class_name.clone(),
        })?;

    Ok(StorageRow {
        class_id,
        bbox: aug.bbox,
    })
}
