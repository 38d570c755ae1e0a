//! Matching utilities for multi-object tracking.

use ndarray::Array2;

use crate::tracker::TrackerError;
use crate::tracker::rect::Rect;

/// Compute IoU distance matrix between tracks and detections.
pub fn iou_distance(track_boxes: &[Rect], det_boxes: &[Rect]) -> Array2<f32> {
    let mut dists = Array2::zeros((track_boxes.len(), det_boxes.len()));
    for (i, t) in track_boxes.iter().enumerate() {
        for (j, d) in det_boxes.iter().enumerate() {
            dists[[i, j]] = 1.0 - t.iou(d);
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Solve the rectangular assignment problem and gate pairs by `thresh`.
///
/// The cost matrix is padded to a square so that `lapjv` can run on it;
/// pairs landing in the padding or costing more than `thresh` stay unmatched.
pub fn linear_assignment(
    cost_matrix: &Array2<f32>,
    thresh: f32,
) -> Result<AssignmentResult, TrackerError> {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return Ok(AssignmentResult {
            matches: vec![],
            unmatched_tracks: (0..num_rows).collect(),
            unmatched_detections: (0..num_cols).collect(),
        });
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), 1e6);
    for ((i, j), &cost) in cost_matrix.indexed_iter() {
        padded[[i, j]] = cost as f64;
    }

    let (row_to_col, _) =
        lapjv::lapjv(&padded).map_err(|e| TrackerError::Assignment(format!("{e:?}")))?;

    let mut result = AssignmentResult::default();
    let mut detection_matched = vec![false; num_cols];

    for (row_idx, &col_idx) in row_to_col.iter().enumerate().take(num_rows) {
        if col_idx < num_cols && cost_matrix[[row_idx, col_idx]] <= thresh {
            result.matches.push((row_idx, col_idx));
            detection_matched[col_idx] = true;
        } else {
            result.unmatched_tracks.push(row_idx);
        }
    }

    result.unmatched_detections = detection_matched
        .iter()
        .enumerate()
        .filter_map(|(i, &matched)| (!matched).then_some(i))
        .collect();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_pairs_overlapping_boxes() {
        let tracks = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(100.0, 100.0, 10.0, 10.0)];
        let dets = [Rect::new(101.0, 101.0, 10.0, 10.0), Rect::new(1.0, 1.0, 10.0, 10.0)];
        let dists = iou_distance(&tracks, &dets);

        let result = linear_assignment(&dists, 0.7).unwrap();
        let mut matches = result.matches.clone();
        matches.sort();
        assert_eq!(matches, vec![(0, 1), (1, 0)]);
        assert!(result.unmatched_tracks.is_empty());
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_assignment_gates_distant_pairs() {
        let tracks = [Rect::new(0.0, 0.0, 10.0, 10.0)];
        let dets = [Rect::new(50.0, 50.0, 10.0, 10.0), Rect::new(2.0, 2.0, 10.0, 10.0)];
        let dists = iou_distance(&tracks, &dets);

        let result = linear_assignment(&dists, 0.7).unwrap();
        assert_eq!(result.matches, vec![(0, 1)]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_assignment_empty_sides() {
        let dists = iou_distance(&[], &[Rect::new(0.0, 0.0, 1.0, 1.0)]);
        let result = linear_assignment(&dists, 0.7).unwrap();
        assert_eq!(result.unmatched_detections, vec![0]);
        assert!(result.matches.is_empty());
    }
}
