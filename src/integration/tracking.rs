//! Tracker seam: per-frame association of filtered detections into
//! identities.

use std::fmt;

use image::RgbImage;

use crate::tracker::Rect;

/// Opaque, stable track identifier.
///
/// Trackers may hand out integers or strings; both are carried as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(String);

impl TrackId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A filtered detection in the geometry trackers consume.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerInput {
    /// Box in TLWH form (x, y, width, height)
    pub rect: Rect,
    pub score: f32,
    pub class_label: String,
}

impl TrackerInput {
    pub fn new(rect: Rect, score: f32, class_label: impl Into<String>) -> Self {
        Self {
            rect,
            score,
            class_label: class_label.into(),
        }
    }
}

/// One track as reported by a tracker for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub track_id: TrackId,
    /// Current box; use [`Rect::to_tlbr`] for corner form
    pub rect: Rect,
    /// Whether the identity is stable enough to be reported
    pub confirmed: bool,
}

impl Track {
    pub fn new(track_id: impl Into<TrackId>, rect: Rect, confirmed: bool) -> Self {
        Self {
            track_id: track_id.into(),
            rect,
            confirmed,
        }
    }

    /// Integer midpoint of the box, used as the track's location.
    pub fn centroid(&self) -> (i32, i32) {
        self.rect.centroid()
    }
}

/// Trait for multi-object trackers.
///
/// The pipeline calls [`Tracker::reset`] before each run so identities never
/// leak from one video into the next.
pub trait Tracker {
    /// Error type for tracking failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Associate this frame's detections with existing identities.
    fn update(
        &mut self,
        detections: &[TrackerInput],
        frame: &RgbImage,
    ) -> Result<Vec<Track>, Self::Error>;

    /// Drop all identities and start over.
    fn reset(&mut self);
}
