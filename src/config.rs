//! Pipeline configuration with serde-backed overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::InsightsParams;
use crate::annotate::AnnotationStyle;
use crate::error::PipelineError;
use crate::integration::DetectionFilter;
use crate::tracker::SortConfig;

/// Configuration for [`AnalyticsPipeline`](crate::AnalyticsPipeline).
///
/// Every field has a default, so a JSON override only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Detector class that is tracked and counted
    pub target_class: String,
    /// Detections at or below this confidence are discarded
    pub confidence_threshold: f32,
    /// Width of an occupancy window in seconds
    pub bucket_seconds: u32,
    /// Cells strictly above this percentile are hotspots
    pub hotspot_percentile: f64,
    pub max_hotspots: usize,
    /// Decimal places kept in the average dwell time
    pub dwell_precision: u32,
    /// Settings for the built-in tracker
    pub tracker: SortConfig,
    pub annotation: AnnotationStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_class: "person".to_string(),
            confidence_threshold: 0.3,
            bucket_seconds: 60,
            hotspot_percentile: 99.5,
            max_hotspots: 20,
            dwell_precision: 2,
            tracker: SortConfig::default(),
            annotation: AnnotationStyle::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(PipelineError::InvalidConfig(format!(
                "confidence_threshold {} outside [0, 1]",
                self.confidence_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.hotspot_percentile) {
            return Err(PipelineError::InvalidConfig(format!(
                "hotspot_percentile {} outside [0, 100]",
                self.hotspot_percentile
            )));
        }
        if self.bucket_seconds == 0 {
            return Err(PipelineError::InvalidConfig(
                "bucket_seconds must be positive".to_string(),
            ));
        }
        if self.target_class.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "target_class must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn detection_filter(&self) -> DetectionFilter {
        DetectionFilter::new(self.target_class.as_str(), self.confidence_threshold)
    }

    pub fn insights_params(&self, fps: f64) -> InsightsParams {
        InsightsParams {
            fps,
            hotspot_percentile: self.hotspot_percentile,
            max_hotspots: self.max_hotspots,
            dwell_precision: self.dwell_precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{ "confidence_threshold": 0.5, "tracker": { "n_init": 1 } }"#,
        )
        .unwrap();
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.target_class, "person");
        assert_eq!(config.tracker.n_init, 1);
        assert_eq!(config.tracker.max_age, 30);
        assert_eq!(config.max_hotspots, 20);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PipelineConfig::from_json_str(r#"{ "confidence_threshold": 1.5 }"#).is_err());
        assert!(PipelineConfig::from_json_str(r#"{ "hotspot_percentile": -1 }"#).is_err());
        assert!(PipelineConfig::from_json_str(r#"{ "bucket_seconds": 0 }"#).is_err());
    }

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }
}
