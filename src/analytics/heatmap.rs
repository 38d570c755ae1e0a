//! Foot-traffic density grid.

use image::RgbImage;
use ndarray::Array2;
use tracing::debug;

use super::colormap;

/// Dense occupancy grid matching the frame resolution.
///
/// Cells are indexed `[[row, col]]`, i.e. `[[y, x]]`; every public method
/// takes and returns `(x, y)`.
#[derive(Debug, Clone)]
pub struct HeatmapAccumulator {
    grid: Array2<f32>,
    dropped: u64,
}

impl HeatmapAccumulator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: Array2::zeros((height as usize, width as usize)),
            dropped: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.ncols()
    }

    pub fn height(&self) -> usize {
        self.grid.nrows()
    }

    /// Add one unit of mass at `(x, y)`. Points outside the grid are dropped.
    pub fn record(&mut self, x: i32, y: i32) -> bool {
        let in_bounds =
            x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height();
        if !in_bounds {
            self.dropped += 1;
            debug!(x, y, "centroid outside frame, not recorded");
            return false;
        }
        self.grid[[y as usize, x as usize]] += 1.0;
        true
    }

    /// Raw accumulated counts.
    pub fn grid(&self) -> &Array2<f32> {
        &self.grid
    }

    /// Points rejected by [`record`](Self::record) so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Min-max normalise to `[0, 255]` and colorize. Consumes the accumulator,
    /// so a grid can only be finalized once.
    pub fn finalize(self) -> FinalizedHeatmap {
        let normalized = normalize(&self.grid);
        let image = colorize(&normalized);
        FinalizedHeatmap {
            raw: self.grid,
            normalized,
            image,
        }
    }
}

/// Output of [`HeatmapAccumulator::finalize`].
#[derive(Debug, Clone)]
pub struct FinalizedHeatmap {
    /// Counts as accumulated, before normalisation
    pub raw: Array2<f32>,
    /// Min-max scaled to `[0, 255]`
    pub normalized: Array2<u8>,
    /// Jet-colored raster, same width and height as the grid
    pub image: RgbImage,
}

fn normalize(grid: &Array2<f32>) -> Array2<u8> {
    let (min, max) = grid
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return Array2::zeros(grid.raw_dim());
    }
    grid.mapv(|v| ((v - min) / range * 255.0).clamp(0.0, 255.0) as u8)
}

fn colorize(normalized: &Array2<u8>) -> RgbImage {
    let (rows, cols) = normalized.dim();
    RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        colormap::jet(normalized[[y as usize, x as usize]])
    })
}
