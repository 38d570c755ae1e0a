//! End-of-run summary derived from the aggregates.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::{TemporalBucketer, TrackLedger};
use crate::error::PipelineError;

/// Grid coordinate reported as `(x, y)`.
pub type Point = (usize, usize);

/// Final analytics document for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub total_people: usize,
    /// Mean dwell time, rounded to two decimals
    pub avg_time_in_frame_sec: f64,
    pub most_visited_point: Point,
    pub hotspots: Vec<Point>,
    pub people_per_minute: BTreeMap<String, usize>,
}

/// Knobs for [`InsightsReport::compute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightsParams {
    pub fps: f64,
    pub hotspot_percentile: f64,
    pub max_hotspots: usize,
    pub dwell_precision: u32,
}

impl InsightsReport {
    /// Build the report from the raw (pre-normalisation) heatmap grid.
    pub fn compute(
        ledger: &TrackLedger,
        bucketer: &TemporalBucketer,
        raw_heatmap: &Array2<f32>,
        params: &InsightsParams,
    ) -> Self {
        Self {
            total_people: ledger.len(),
            avg_time_in_frame_sec: round_to(
                ledger.average_dwell_seconds(params.fps),
                params.dwell_precision,
            ),
            most_visited_point: most_visited_point(raw_heatmap),
            hotspots: hotspots(raw_heatmap, params.hotspot_percentile, params.max_hotspots),
            people_per_minute: bucketer.occupancy(),
        }
    }

    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the report as pretty-printed JSON, replacing any existing file.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Coordinate of the first maximum in row-major order; the origin when the
/// grid is empty or uniformly zero.
pub fn most_visited_point(grid: &Array2<f32>) -> Point {
    let mut best = (0, 0);
    let mut best_value = 0.0f32;
    for ((row, col), &value) in grid.indexed_iter() {
        if value > best_value {
            best_value = value;
            best = (col, row);
        }
    }
    best
}

/// Up to `limit` coordinates strictly above the given percentile of all
/// cell values, in row-major discovery order.
pub fn hotspots(grid: &Array2<f32>, percentile_rank: f64, limit: usize) -> Vec<Point> {
    let Some(threshold) = percentile(grid.iter().copied(), percentile_rank) else {
        return Vec::new();
    };
    grid.indexed_iter()
        .filter(|&(_, &value)| value as f64 > threshold)
        .map(|((row, col), _)| (col, row))
        .take(limit)
        .collect()
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(values: impl IntoIterator<Item = f32>, rank: f64) -> Option<f64> {
    let mut sorted: Vec<f32> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable_by(f32::total_cmp);

    let position = rank.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    let lo = sorted[lower] as f64;
    let hi = sorted[upper] as f64;
    Some(lo + (hi - lo) * fraction)
}
