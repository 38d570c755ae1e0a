//! Integration module for connecting detectors, trackers and video I/O with
//! the analytics aggregates.
//!
//! Detectors and trackers are capability traits so any inference backend or
//! tracking engine can be plugged into the [`AnalyticsPipeline`].

mod builder;
mod detector;
mod filter;
mod pipeline;
mod tracking;
mod video;

pub use builder::DetectionBuilder;
pub use detector::{Detection, Detector};
pub use filter::DetectionFilter;
pub use pipeline::{AnalyticsPipeline, PipelineOutput};
pub use tracking::{Track, TrackId, Tracker, TrackerInput};
pub use video::{FrameSink, FrameSource, VecFrameSink, VecFrameSource, VideoInfo};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel, RawDetection};
