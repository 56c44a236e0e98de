//! Per-image outcomes and the batch summary.

use std::fmt;

/// What happened to one input image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Augmented image and label were written.
    Written { boxes: usize },
    /// The label file has no object lines.
    NoObjects,
    /// The image or its label file could not be loaded.
    LoadFailed(String),
    /// The pipeline produced an image with no pixels.
    EmptyImage,
    /// Every box was dropped by the pipeline.
    EmptyLabels,
    /// A transformed box had a negative value; nothing was written.
    NegativeElement,
    /// A per-image error such as an unknown class index.
    Failed(String),
}

impl ImageOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

impl fmt::Display for ImageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written { boxes } => write!(f, "written with {boxes} box(es)"),
            Self::NoObjects => write!(f, "no object in label file"),
            Self::LoadFailed(message) => write!(f, "load failed: {message}"),
            Self::EmptyImage => write!(f, "augmented image is empty"),
            Self::EmptyLabels => write!(f, "augmented label is empty"),
            Self::NegativeElement => write!(f, "negative element in transformed bounding box"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Outcomes for every processed image, in processing order.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<(String, ImageOutcome)>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, file_name: impl Into<String>, outcome: ImageOutcome) {
        self.entries.push((file_name.into(), outcome));
    }

    pub fn processed_count(&self) -> usize {
        self.entries.len()
    }

    pub fn written_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_written())
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.processed_count() - self.written_count()
    }

    pub fn outcome(&self, file_name: &str) -> Option<&ImageOutcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, outcome)| outcome)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped_count() == 0 {
            return writeln!(
                f,
                "Augmentation finished: {} image(s) written",
                self.written_count()
            );
        }

        writeln!(
            f,
            "Augmentation finished with {} image(s) written and {} skipped:",
            self.written_count(),
            self.skipped_count()
        )?;
        writeln!(f)?;

        for (name, outcome) in self.entries.iter().filter(|(_, o)| !o.is_written()) {
            writeln!(f, "  {name}: {outcome}")?;
        }

        Ok(())
    }
}
