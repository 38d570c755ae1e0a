use std::error::Error as StdError;

use thiserror::Error;

use crate::integration::TrackId;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that abort a pipeline run or fail to persist its artifacts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("frame source failed: {0}")]
    Source(#[source] BoxError),
    #[error("detector failed on frame {frame}: {source}")]
    Detector {
        frame: u64,
        #[source]
        source: BoxError,
    },
    #[error("tracker failed on frame {frame}: {source}")]
    Tracker {
        frame: u64,
        #[source]
        source: BoxError,
    },
    #[error("tracker returned a malformed box for track {track_id} on frame {frame}")]
    MalformedTrack { frame: u64, track_id: TrackId },
    #[error("frame sink failed: {0}")]
    Sink(#[source] BoxError),
    #[error("invalid video: {width}x{height} at {fps} fps")]
    InvalidVideo { width: u32, height: u32, fps: f64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
