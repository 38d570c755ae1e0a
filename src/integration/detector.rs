//! Detector seam: anything that turns one frame into labelled boxes.

use image::RgbImage;

use crate::tracker::Rect;

/// A single candidate observation produced by a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Bounding box in TLBR pixel coordinates (x1, y1, x2, y2)
    pub bbox: [i32; 4],
    /// Detector confidence in [0, 1]
    pub confidence: f32,
    /// Class name, e.g. "person"
    pub class_label: String,
}

impl Detection {
    /// Create a detection from TLBR corners; coordinates are truncated to
    /// whole pixels, saturating at the `i32` range (NaN becomes 0).
    pub fn new(
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        confidence: f32,
        class_label: impl Into<String>,
    ) -> Self {
        Self {
            bbox: [x1 as i32, y1 as i32, x2 as i32, y2 as i32],
            confidence,
            class_label: class_label.into(),
        }
    }

    /// The box in TLWH form.
    pub fn rect(&self) -> Rect {
        let [x1, y1, x2, y2] = self.bbox.map(i64::from);
        Rect::new(x1 as f32, y1 as f32, (x2 - x1) as f32, (y2 - y1) as f32)
    }
}

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the analytics
/// pipeline.
///
/// # Example
///
/// ```ignore
/// use footfall::{Detection, Detector};
/// use image::RgbImage;
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl Detector for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Detector {
    /// Error type for detection failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run inference on one frame and return every candidate, regardless of
    /// class or confidence.
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>, Self::Error>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    type Error = D::Error;

    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>, Self::Error> {
        (**self).detect(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_corners() {
        let det = Detection::new(10.7, 20.2, 50.9, 100.0, 0.9, "person");
        assert_eq!(det.bbox, [10, 20, 50, 100]);
        assert_eq!(det.rect(), Rect::new(10.0, 20.0, 40.0, 80.0));
    }

    #[test]
    fn test_unbounded_corners_saturate() {
        let det = Detection::new(f32::NEG_INFINITY, 0.0, f32::INFINITY, 10.0, 0.9, "person");
        assert_eq!(det.bbox, [i32::MIN, 0, i32::MAX, 10]);

        let rect = det.rect();
        assert_eq!(rect.x, i32::MIN as f32);
        assert_eq!(rect.width, u32::MAX as f32);
        assert_eq!(rect.height, 10.0);
    }
}
