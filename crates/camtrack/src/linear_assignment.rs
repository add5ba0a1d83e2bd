use ndarray::*;
use pathfinding::{kuhn_munkres::kuhn_munkres_min, matrix::Matrix};

/// Scale applied to convert [0.0..~1.0] f32 costs into i64, which the
/// assignment solver requires (f32 does not implement `std::cmp::Ord`).
const COST_SCALE: f32 = 10_000_000_000.0;

/// One matched (track, detection) pair.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Match {
    pub track_idx: usize,
    pub detection_idx: usize,
    pub cost: f32,
}

/// Result of one assignment round, by index into the caller's track and
/// detection lists.
#[derive(Debug, Clone, Default)]
pub(crate) struct AssignmentOutcome {
    pub matches: Vec<Match>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Solve the minimum-cost bipartite assignment over a cost matrix.
///
/// Rows are tracks in registry order (ascending track id), columns are
/// detections in arrival order. The solver is deterministic and resolves
/// equal-cost optima by row scan order, so ties land on the lower track
/// identifier.
///
/// # Parameters
///
/// * `cost_matrix`: Shape `(tracks, detections)`. Cells holding
///   `f32::INFINITY` mark gated-out pairs.
/// * `max_cost`: Ceiling; assignments with cost at or above this value are
///   reported as unmatched on both sides.
pub(crate) fn min_cost_matching(cost_matrix: &Array2<f32>, max_cost: f32) -> AssignmentOutcome {
    let (n_tracks, n_detections) = cost_matrix.dim();
    if n_tracks == 0 || n_detections == 0 {
        return AssignmentOutcome {
            matches: vec![],
            unmatched_tracks: (0..n_tracks).collect(),
            unmatched_detections: (0..n_detections).collect(),
        };
    }

    // the solver requires rows <= columns; transpose when tracks outnumber
    // detections and map indices back afterwards
    let transposed = n_tracks > n_detections;
    let (rows, cols) = if transposed {
        (n_detections, n_tracks)
    } else {
        (n_tracks, n_detections)
    };

    let mut weights = Matrix::new(rows, cols, 0i64);
    for row in 0..rows {
        for col in 0..cols {
            let (track_idx, detection_idx) = if transposed { (col, row) } else { (row, col) };
            let cost = cost_matrix[[track_idx, detection_idx]].min(max_cost + 1e-5);
            weights[(row, col)] = (cost * COST_SCALE) as i64;
        }
    }

    let (_, assignment) = kuhn_munkres_min(&weights);

    let mut track_matched = vec![false; n_tracks];
    let mut detection_matched = vec![false; n_detections];
    let mut matches = Vec::with_capacity(rows);
    for (row, col) in assignment.into_iter().enumerate() {
        let (track_idx, detection_idx) = if transposed { (col, row) } else { (row, col) };
        let cost = cost_matrix[[track_idx, detection_idx]];
        if cost < max_cost {
            track_matched[track_idx] = true;
            detection_matched[detection_idx] = true;
            matches.push(Match {
                track_idx,
                detection_idx,
                cost,
            });
        }
    }

    AssignmentOutcome {
        matches,
        unmatched_tracks: (0..n_tracks).filter(|i| !track_matched[*i]).collect(),
        unmatched_detections: (0..n_detections)
            .filter(|j| !detection_matched[*j])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::*;

    #[test]
    fn min_cost_matching_with_unmatched_on_both_sides() {
        // track 0 fits detection 1, track 1 fits detection 2; track 2 and
        // detection 0 are nowhere near anything
        let costs = arr2::<f32, _>(&[
            [1.0, 0.0, 0.05],
            [1.0, 0.05, 0.0],
            [1.0, 1.0, 1.0],
        ]);
        let outcome = min_cost_matching(&costs, 0.7);

        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.matches[0].track_idx, 0);
        assert_eq!(outcome.matches[0].detection_idx, 1);
        assert_eq!(outcome.matches[1].track_idx, 1);
        assert_eq!(outcome.matches[1].detection_idx, 2);
        assert_eq!(outcome.unmatched_tracks, vec![2]);
        assert_eq!(outcome.unmatched_detections, vec![0]);
    }

    #[test]
    fn more_tracks_than_detections() {
        let costs = arr2::<f32, _>(&[[0.9], [0.1], [0.5]]);
        let outcome = min_cost_matching(&costs, 0.7);

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].track_idx, 1);
        assert_eq!(outcome.matches[0].detection_idx, 0);
        assert_eq!(outcome.unmatched_tracks, vec![0, 2]);
        assert!(outcome.unmatched_detections.is_empty());
    }

    #[test]
    fn gated_pairs_are_never_assigned() {
        let costs = arr2::<f32, _>(&[[f32::INFINITY, 0.2], [0.3, f32::INFINITY]]);
        let outcome = min_cost_matching(&costs, 0.7);

        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.matches[0].detection_idx, 1);
        assert_eq!(outcome.matches[1].detection_idx, 0);
    }

    #[test]
    fn least_bad_option_above_ceiling_stays_unmatched() {
        let costs = arr2::<f32, _>(&[[0.95]]);
        let outcome = min_cost_matching(&costs, 0.7);

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.unmatched_tracks, vec![0]);
        assert_eq!(outcome.unmatched_detections, vec![0]);
    }

    #[test]
    fn empty_inputs() {
        let outcome = min_cost_matching(&Array2::<f32>::zeros((0, 2)), 0.7);
        assert!(outcome.matches.is_empty());
        assert!(outcome.unmatched_tracks.is_empty());
        assert_eq!(outcome.unmatched_detections, vec![0, 1]);

        let outcome = min_cost_matching(&Array2::<f32>::zeros((2, 0)), 0.7);
        assert_eq!(outcome.unmatched_tracks, vec![0, 1]);
        assert!(outcome.unmatched_detections.is_empty());
    }

    #[test]
    fn repeated_symmetric_scenarios_resolve_identically() {
        let costs = arr2::<f32, _>(&[[0.3, 0.3], [0.3, 0.3]]);
        let first = min_cost_matching(&costs, 0.7);
        for _ in 0..10 {
            let outcome = min_cost_matching(&costs, 0.7);
            assert_eq!(outcome.matches, first.matches);
        }
    }
}
