//! Distinct identities per fixed-width time window.

use std::collections::{BTreeMap, BTreeSet};

use crate::integration::TrackId;

/// Groups identities into consecutive windows of `bucket_seconds`.
#[derive(Debug, Clone)]
pub struct TemporalBucketer {
    bucket_seconds: u32,
    buckets: BTreeMap<u64, BTreeSet<TrackId>>,
}

impl TemporalBucketer {
    /// One-minute windows.
    pub fn new() -> Self {
        Self::with_bucket_seconds(60)
    }

    /// `bucket_seconds` of zero is treated as one second.
    pub fn with_bucket_seconds(bucket_seconds: u32) -> Self {
        Self {
            bucket_seconds: bucket_seconds.max(1),
            buckets: BTreeMap::new(),
        }
    }

    pub fn bucket_seconds(&self) -> u32 {
        self.bucket_seconds
    }

    /// Window index that `frame_index` falls into.
    pub fn bucket_index(&self, frame_index: u64, fps: f64) -> u64 {
        (frame_index as f64 / fps / self.bucket_seconds as f64).floor() as u64
    }

    /// Add an identity to the window of `frame_index`. Repeats are absorbed.
    pub fn observe(&mut self, track_id: &TrackId, frame_index: u64, fps: f64) {
        let bucket = self.bucket_index(frame_index, fps);
        let members = self.buckets.entry(bucket).or_default();
        if !members.contains(track_id) {
            members.insert(track_id.clone());
        }
    }

    pub fn buckets(&self) -> &BTreeMap<u64, BTreeSet<TrackId>> {
        &self.buckets
    }

    /// Every identity that appears in any window.
    pub fn identities(&self) -> impl Iterator<Item = &TrackId> {
        self.buckets.values().flatten()
    }

    /// Distinct identity count per window, keyed by its `"MM:SS–MM:SS"` label.
    pub fn occupancy(&self) -> BTreeMap<String, usize> {
        self.buckets
            .iter()
            .map(|(&bucket, members)| (self.label(bucket), members.len()))
            .collect()
    }

    /// Human-readable range for a window, e.g. `"00:00–01:00"` for bucket 0
    /// with one-minute windows.
    pub fn label(&self, bucket: u64) -> String {
        let width = self.bucket_seconds as u64;
        format!(
            "{}\u{2013}{}",
            clock(bucket * width),
            clock((bucket + 1) * width)
        )
    }
}

impl Default for TemporalBucketer {
    fn default() -> Self {
        Self::new()
    }
}

fn clock(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
