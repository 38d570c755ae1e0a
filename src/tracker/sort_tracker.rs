//! IoU + Kalman multi-object tracker with a confirmation window.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::integration::{Track, TrackId, Tracker, TrackerInput};
use crate::tracker::TrackerError;
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::rect::Rect;
use crate::tracker::track::SortTrack;

/// Configuration for the [`SortTracker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Frames a confirmed track may go unmatched before it is deleted.
    pub max_age: u32,
    /// Consecutive hits needed before a track is confirmed.
    pub n_init: u32,
    /// Assignments with an IoU distance above this are rejected.
    pub max_iou_distance: f32,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            max_age: 30,
            n_init: 3,
            max_iou_distance: 0.7,
        }
    }
}

/// Built-in tracker.
///
/// Identifiers are allocated from a per-instance counter, so two trackers
/// never share id state and [`Tracker::reset`] starts numbering at 1 again.
pub struct SortTracker {
    tracks: Vec<SortTrack>,
    next_id: u64,
    frame_id: u64,
    config: SortConfig,
    kalman_filter: KalmanFilter,
}

impl SortTracker {
    pub fn new(config: SortConfig) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
            frame_id: 0,
            config,
            kalman_filter: KalmanFilter::default(),
        }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Live tracks, including tentative and coasting ones.
    pub fn tracks(&self) -> &[SortTrack] {
        &self.tracks
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Advance one frame with the given detections.
    pub fn step(&mut self, detections: &[TrackerInput]) -> Result<Vec<Track>, TrackerError> {
        self.frame_id += 1;

        // zero-height boxes would make the Kalman projection singular
        let detections: Vec<&TrackerInput> = detections
            .iter()
            .filter(|d| d.rect.is_well_formed() && d.rect.height > 0.0)
            .collect();

        for track in self.tracks.iter_mut() {
            track.predict(&self.kalman_filter);
        }

        let track_rects: Vec<Rect> = self.tracks.iter().map(|t| t.rect()).collect();
        let det_rects: Vec<Rect> = detections.iter().map(|d| d.rect).collect();
        let dists = matching::iou_distance(&track_rects, &det_rects);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::linear_assignment(&dists, self.config.max_iou_distance)?;

        for (itrack, idet) in matches {
            let det = &detections[idet];
            self.tracks[itrack].update(&det.rect, &self.kalman_filter, self.config.n_init)?;
        }

        for itrack in unmatched_tracks {
            self.tracks[itrack].mark_missed(self.config.max_age);
        }

        for idet in unmatched_detections {
            let det = &detections[idet];
            let id = self.allocate_id();
            trace!(track_id = id, frame = self.frame_id, "new tentative track");
            self.tracks.push(SortTrack::new(id, &det.rect, &self.kalman_filter, self.config.n_init));
        }

        self.tracks.retain(|t| !t.is_deleted());

        Ok(self
            .tracks
            .iter()
            .map(|t| Track {
                track_id: TrackId::from(t.track_id),
                rect: t.rect(),
                confirmed: t.is_confirmed() && t.time_since_update == 0,
            })
            .collect())
    }
}

impl Default for SortTracker {
    fn default() -> Self {
        Self::new(SortConfig::default())
    }
}

impl Tracker for SortTracker {
    type Error = TrackerError;

    fn update(
        &mut self,
        detections: &[TrackerInput],
        _frame: &RgbImage,
    ) -> Result<Vec<Track>, Self::Error> {
        self.step(detections)
    }

    fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 1;
        self.frame_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(x: f32, y: f32) -> TrackerInput {
        TrackerInput::new(Rect::new(x, y, 40.0, 80.0), 0.9, "person")
    }

    #[test]
    fn test_confirmation_after_n_init_hits() {
        let mut tracker = SortTracker::default();

        let t1 = tracker.step(&[person(100.0, 100.0)]).unwrap();
        assert_eq!(t1.len(), 1);
        assert!(!t1[0].confirmed);

        let t2 = tracker.step(&[person(102.0, 100.0)]).unwrap();
        assert!(!t2[0].confirmed);

        let t3 = tracker.step(&[person(104.0, 100.0)]).unwrap();
        assert!(t3[0].confirmed);
        assert_eq!(t3[0].track_id, TrackId::from(1u64));
    }

    #[test]
    fn test_tentative_track_dropped_on_miss() {
        let mut tracker = SortTracker::default();
        tracker.step(&[person(100.0, 100.0)]).unwrap();
        let tracks = tracker.step(&[]).unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn test_confirmed_track_coasts_until_max_age() {
        let config = SortConfig {
            max_age: 2,
            ..SortConfig::default()
        };
        let mut tracker = SortTracker::new(config);
        for _ in 0..3 {
            tracker.step(&[person(100.0, 100.0)]).unwrap();
        }

        let coasting = tracker.step(&[]).unwrap();
        assert_eq!(coasting.len(), 1);
        assert!(!coasting[0].confirmed);

        tracker.step(&[]).unwrap();
        let gone = tracker.step(&[]).unwrap();
        assert!(gone.is_empty());
    }

    #[test]
    fn test_reset_restarts_ids() {
        let mut tracker = SortTracker::default();
        tracker.step(&[person(0.0, 0.0), person(300.0, 0.0)]).unwrap();
        tracker.reset();
        let tracks = tracker.step(&[person(0.0, 0.0)]).unwrap();
        assert_eq!(tracks[0].track_id, TrackId::from(1u64));
    }
}
