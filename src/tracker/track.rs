//! Single object track for the built-in SORT tracker.

use nalgebra::SVector;

use crate::tracker::TrackerError;
use crate::tracker::kalman_filter::{KalmanFilter, Measurement, StateCovariance, StateVector};
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Single object track.
#[derive(Debug, Clone)]
pub struct SortTrack {
    /// Identifier, unique within one tracker instance
    pub track_id: u64,
    /// Current lifecycle state
    pub state: TrackState,
    /// Number of associated detections since creation
    pub hits: u32,
    /// Total number of frames since creation
    pub age: u32,
    /// Frames since the last associated detection
    pub time_since_update: u32,
    mean: StateVector,
    covariance: StateCovariance,
}

fn measurement(rect: &Rect) -> Measurement {
    let xyah = rect.to_xyah();
    SVector::from_iterator(xyah.iter().map(|&v| v as f64))
}

impl SortTrack {
    /// Create a tentative track from an unassociated detection.
    ///
    /// With `n_init <= 1` the first hit is already enough and the track starts
    /// out confirmed.
    pub fn new(track_id: u64, rect: &Rect, kalman_filter: &KalmanFilter, n_init: u32) -> Self {
        let (mean, covariance) = kalman_filter.initiate(measurement(rect));
        let state = if n_init <= 1 {
            TrackState::Confirmed
        } else {
            TrackState::Tentative
        };
        Self {
            track_id,
            state,
            hits: 1,
            age: 1,
            time_since_update: 0,
            mean,
            covariance,
        }
    }

    /// Current bounding box estimate in TLWH form.
    pub fn rect(&self) -> Rect {
        Rect::from_xyah(
            self.mean[0] as f32,
            self.mean[1] as f32,
            self.mean[2] as f32,
            self.mean[3] as f32,
        )
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    pub fn is_deleted(&self) -> bool {
        self.state == TrackState::Deleted
    }

    /// Propagate the state one frame forward.
    pub fn predict(&mut self, kalman_filter: &KalmanFilter) {
        let (mean, covariance) = kalman_filter.predict(&self.mean, &self.covariance);
        self.mean = mean;
        self.covariance = covariance;
        self.age += 1;
        self.time_since_update += 1;
    }

    /// Fold an associated detection into the state.
    pub fn update(
        &mut self,
        rect: &Rect,
        kalman_filter: &KalmanFilter,
        n_init: u32,
    ) -> Result<(), TrackerError> {
        let (mean, covariance) =
            kalman_filter.update(&self.mean, &self.covariance, measurement(rect))?;
        self.mean = mean;
        self.covariance = covariance;
        self.hits += 1;
        self.time_since_update = 0;

        if self.state == TrackState::Tentative && self.hits >= n_init {
            self.state = TrackState::Confirmed;
        }
        Ok(())
    }

    /// Handle a frame without an associated detection.
    pub fn mark_missed(&mut self, max_age: u32) {
        if self.state == TrackState::Tentative || self.time_since_update > max_age {
            self.state = TrackState::Deleted;
        }
    }
}
