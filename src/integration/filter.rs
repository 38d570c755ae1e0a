//! Restricts raw detector output to the class being counted.

use super::{Detection, TrackerInput};

/// Keeps detections of one class above a confidence floor.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionFilter {
    target_class: String,
    confidence_threshold: f32,
}

impl DetectionFilter {
    pub fn new(target_class: impl Into<String>, confidence_threshold: f32) -> Self {
        Self {
            target_class: target_class.into(),
            confidence_threshold,
        }
    }

    pub fn target_class(&self) -> &str {
        &self.target_class
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Whether a single detection survives the filter. The threshold is
    /// exclusive.
    pub fn accepts(&self, detection: &Detection) -> bool {
        detection.class_label == self.target_class
            && detection.confidence > self.confidence_threshold
    }

    /// Filter one frame's detections and convert them to TLWH tracker input.
    pub fn apply(&self, detections: &[Detection]) -> Vec<TrackerInput> {
        detections
            .iter()
            .filter(|d| self.accepts(d))
            .map(|d| TrackerInput::new(d.rect(), d.confidence, self.target_class.as_str()))
            .collect()
    }
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self::new("person", 0.3)
    }
}
