mod kalman_filter;
mod matching;
mod rect;
mod sort_tracker;
mod track;
mod track_state;

use thiserror::Error;

pub use kalman_filter::KalmanFilter;
pub use matching::{AssignmentResult, iou_distance, linear_assignment};
pub use rect::Rect;
pub use sort_tracker::{SortConfig, SortTracker};
pub use track::SortTrack;
pub use track_state::TrackState;

/// Failures inside the built-in tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("projected covariance is singular")]
    SingularCovariance,
    #[error("assignment solver failed: {0}")]
    Assignment(String),
}
