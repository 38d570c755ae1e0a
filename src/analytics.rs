//! Spatial and temporal aggregates built up over one pipeline run.

mod bucketer;
mod colormap;
mod heatmap;
mod insights;
mod ledger;

pub use bucketer::TemporalBucketer;
pub use colormap::jet;
pub use heatmap::{FinalizedHeatmap, HeatmapAccumulator};
pub use insights::{InsightsParams, InsightsReport, Point, hotspots, most_visited_point, percentile};
pub use ledger::{TrackLedger, TrackRecord, TrajectoryPoint};

use crate::integration::TrackId;

/// Heatmap, ledger and bucketer for a single video.
///
/// All three are updated through [`Aggregates::observe`], so every identity
/// found in a time bucket also has a ledger record.
#[derive(Debug, Clone)]
pub struct Aggregates {
    fps: f64,
    heatmap: HeatmapAccumulator,
    ledger: TrackLedger,
    bucketer: TemporalBucketer,
}

impl Aggregates {
    pub fn new(width: u32, height: u32, fps: f64, bucket_seconds: u32) -> Self {
        Self {
            fps,
            heatmap: HeatmapAccumulator::new(width, height),
            ledger: TrackLedger::new(),
            bucketer: TemporalBucketer::with_bucket_seconds(bucket_seconds),
        }
    }

    /// Record one confirmed sighting at centroid `(x, y)`.
    pub fn observe(&mut self, track_id: &TrackId, x: i32, y: i32, frame_index: u64) {
        self.heatmap.record(x, y);
        self.ledger.observe(track_id, x, y, frame_index);
        self.bucketer.observe(track_id, frame_index, self.fps);
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn heatmap(&self) -> &HeatmapAccumulator {
        &self.heatmap
    }

    pub fn ledger(&self) -> &TrackLedger {
        &self.ledger
    }

    pub fn bucketer(&self) -> &TemporalBucketer {
        &self.bucketer
    }

    /// Compute the report and finalize the heatmap. Consumes the aggregates.
    pub fn finish(self, params: &InsightsParams) -> (InsightsReport, FinalizedHeatmap) {
        let report =
            InsightsReport::compute(&self.ledger, &self.bucketer, self.heatmap.grid(), params);
        (report, self.heatmap.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucketed_ids_always_in_ledger() {
        let mut aggregates = Aggregates::new(64, 48, 10.0, 60);
        let ids: Vec<TrackId> = (1..=5u64).map(TrackId::from).collect();
        for frame in 0..2000u64 {
            let id = &ids[(frame % 5) as usize];
            // some centroids fall outside the frame on purpose
            aggregates.observe(id, (frame % 80) as i32 - 8, (frame % 50) as i32, frame);
        }

        for id in aggregates.bucketer().identities() {
            let record = aggregates.ledger().get(id).unwrap();
            assert!(record.last_seen_frame >= record.first_seen_frame);
        }
        assert_eq!(aggregates.ledger().len(), 5);
    }
}
