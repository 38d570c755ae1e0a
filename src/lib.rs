//! Foot-traffic analytics over video.
//!
//! Frames flow through a [`Detector`], a [`DetectionFilter`] and a
//! [`Tracker`]; confirmed tracks feed a density heatmap, a per-identity
//! ledger and per-minute occupancy buckets, which are summarised into an
//! [`InsightsReport`] once the video ends.

pub mod analytics;
pub mod annotate;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod integration;
pub mod tracker;

pub use analytics::{FinalizedHeatmap, InsightsReport};
pub use annotate::{AnnotationStyle, FrameAnnotator};
pub use artifacts::{ArtifactPaths, is_supported_video};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use integration::{
    AnalyticsPipeline, Detection, DetectionBuilder, DetectionFilter, Detector, FrameSink,
    FrameSource, PipelineOutput, Track, TrackId, Tracker, TrackerInput, VideoInfo,
};
pub use tracker::{Rect, SortConfig, SortTracker};
