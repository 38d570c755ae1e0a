//! Per-identity first/last sighting and trajectory.

use std::collections::BTreeMap;

use crate::integration::TrackId;

/// One centroid sample of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrajectoryPoint {
    pub x: i32,
    pub y: i32,
    pub frame_index: u64,
}

/// Everything the ledger knows about one identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub track_id: TrackId,
    pub first_seen_frame: u64,
    pub last_seen_frame: u64,
    pub centroid_history: Vec<TrajectoryPoint>,
}

impl TrackRecord {
    fn new(track_id: TrackId, point: TrajectoryPoint) -> Self {
        Self {
            track_id,
            first_seen_frame: point.frame_index,
            last_seen_frame: point.frame_index,
            centroid_history: vec![point],
        }
    }

    /// Seconds spanned by the first through last confirmed sighting, both
    /// frames included: a track seen on frames 0..=29 at 30 fps dwells 1 s.
    ///
    /// This counts one frame more than `(last - first) / fps`, so a track
    /// seen on a single frame dwells `1 / fps` rather than zero.
    pub fn dwell_seconds(&self, fps: f64) -> f64 {
        (self.last_seen_frame - self.first_seen_frame + 1) as f64 / fps
    }
}

/// Insert-only map of identities to their records.
#[derive(Debug, Clone, Default)]
pub struct TrackLedger {
    records: BTreeMap<TrackId, TrackRecord>,
}

impl TrackLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a confirmed sighting. Frames are expected in increasing order;
    /// an out-of-order frame never moves `last_seen_frame` backwards.
    pub fn observe(&mut self, track_id: &TrackId, x: i32, y: i32, frame_index: u64) {
        let point = TrajectoryPoint { x, y, frame_index };
        match self.records.get_mut(track_id) {
            Some(record) => {
                record.last_seen_frame = record.last_seen_frame.max(frame_index);
                record.centroid_history.push(point);
            }
            None => {
                self.records
                    .insert(track_id.clone(), TrackRecord::new(track_id.clone(), point));
            }
        }
    }

    pub fn get(&self, track_id: &TrackId) -> Option<&TrackRecord> {
        self.records.get(track_id)
    }

    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.records.contains_key(track_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &TrackRecord> {
        self.records.values()
    }

    /// Number of distinct identities ever recorded.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean dwell time over all identities, 0 for an empty ledger.
    pub fn average_dwell_seconds(&self, fps: f64) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: f64 = self.records.values().map(|r| r.dwell_seconds(fps)).sum();
        total / self.records.len() as f64
    }
}
