//! Burn inference backend for object detection.
//!
//! This module provides a `BurnDetector` that implements `Detector` for
//! running object detection models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use footfall::integration::{BurnDetector, BurnModel, RawDetection};
//! use burn::backend::NdArray;
//!
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> Vec<RawDetection> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyYoloModel::load("model.bin");
//! let detector = BurnDetector::new(model, Default::default());
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use image::RgbImage;
use thiserror::Error;

use super::{Detection, DetectionBuilder, Detector};

/// Error type for Burn detection failures.
#[derive(Debug, Clone, Error)]
pub enum BurnDetectorError {
    /// Frame size does not match what the model was exported for.
    #[error("invalid input dimensions: expected {expected:?}, got {got:?}")]
    InvalidInputDimensions { expected: (u32, u32), got: (u32, u32) },
}

/// Raw detection output from the model before NMS.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box: [x1, y1, x2, y2] or [cx, cy, w, h] depending on model
    pub bbox: [f32; 4],
    /// Confidence score
    pub score: f32,
    /// Class index into the detector's label table
    pub class_id: usize,
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on an input tensor of shape [batch, channels, height, width].
    fn forward(&self, input: Tensor<B, 4>) -> Vec<RawDetection>;

    /// Get the expected input size (height, width).
    fn input_size(&self) -> (u32, u32) {
        (640, 640) // Default YOLO input size
    }

    /// Whether bbox output is in XYWH format (vs TLBR).
    fn bbox_is_xywh(&self) -> bool {
        true // Most YOLO variants use XYWH
    }
}

/// Burn-based object detector implementing `Detector`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    conf_threshold: f32,
    labels: Vec<String>,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a detector that only knows the COCO "person" class.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            conf_threshold: 0.25,
            labels: vec!["person".to_string()],
        }
    }

    /// Set the backend-side confidence floor. The pipeline filter still
    /// applies its own threshold afterwards.
    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    /// Replace the class-index to label table.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Convert an RGB frame into a normalised [1, 3, H, W] tensor.
    pub fn preprocess(&self, frame: &RgbImage) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (target_h, target_w) = self.model.input_size();
        let (width, height) = frame.dimensions();
        if height != target_h || width != target_w {
            return Err(BurnDetectorError::InvalidInputDimensions {
                expected: (target_h, target_w),
                got: (height, width),
            });
        }

        // HWC interleaved to planar CHW, scaled to [0, 1]
        let plane = (width * height) as usize;
        let mut data = vec![0.0f32; 3 * plane];
        for (i, pixel) in frame.pixels().enumerate() {
            for c in 0..3 {
                data[c * plane + i] = pixel[c] as f32 / 255.0;
            }
        }

        Ok(Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
            1,
            3,
            height as usize,
            width as usize,
        ]))
    }

    /// Class name for a model output index; indices past the label table
    /// become `class_<n>` and never match the tracked class.
    fn label(&self, class_id: usize) -> String {
        self.labels
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{class_id}"))
    }

    /// Convert raw model outputs to labelled detections.
    fn postprocess(&self, raw_detections: Vec<RawDetection>) -> Vec<Detection> {
        raw_detections
            .into_iter()
            .filter(|d| d.score >= self.conf_threshold)
            .map(|d| {
                let builder = DetectionBuilder::new()
                    .confidence(d.score)
                    .label(self.label(d.class_id));
                let [a, b, c, e] = d.bbox;
                if self.model.bbox_is_xywh() {
                    builder.xywh(a, b, c, e).build()
                } else {
                    builder.tlbr(a, b, c, e).build()
                }
            })
            .collect()
    }
}

impl<B: Backend, M: BurnModel<B>> Detector for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>, Self::Error> {
        let tensor = self.preprocess(frame)?;
        let raw_detections = self.model.forward(tensor);
        Ok(self.postprocess(raw_detections))
    }
}
