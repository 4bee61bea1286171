//! Visiting-order optimization for multi-stop routes
//!
//! The entrance and exit are fixed; the stops between them are reordered
//! to approximately minimize total walking distance. Distances come from
//! refined walking paths, not straight lines, so a stop on the far side of
//! a shelf block costs what it actually costs to walk. Nearest-neighbor
//! builds the initial tour and an endpoint-fixed 2-opt pass improves it.
//! No randomization anywhere: identical inputs give identical orders.

use crate::common::types::{Obstacle, Waypoint};
use crate::grid::occupancy::OccupancyGrid;
use crate::path_planning::refine::RefineConfig;
use crate::routing::planner::find_path_or_fallback;

/// Reversals must beat this margin to be accepted, so floating-point noise
/// cannot flip the tour back and forth
const IMPROVEMENT_EPSILON: f64 = 1e-6;

/// Upper bound on full 2-opt sweeps
const MAX_OPT_PASSES: usize = 100;

/// Pairwise walking distances between all waypoints
///
/// Symmetric; unreachable pairs fall back to the straight-line segment
/// length, matching the composer's degrade-to-usable-path policy.
pub fn distance_matrix(
    grid: &OccupancyGrid,
    obstacles: &[Obstacle],
    waypoints: &[Waypoint],
    refine_config: &RefineConfig,
) -> Vec<Vec<f64>> {
    let n = waypoints.len();
    let mut dist = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let path = find_path_or_fallback(
                grid,
                obstacles,
                waypoints[i].position(),
                waypoints[j].position(),
                refine_config,
            );
            let d = path.length();
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }
    dist
}

/// Compute a visiting order over the distance matrix
///
/// Returns a permutation of `0..n` that always starts at 0 and ends at
/// `n - 1`. With three or fewer waypoints there is nothing to reorder.
pub fn optimize_stop_order(dist: &[Vec<f64>]) -> Vec<usize> {
    let n = dist.len();
    if n <= 3 {
        return (0..n).collect();
    }

    // Nearest-neighbor over the middle stops
    let mut unused: Vec<usize> = (1..n - 1).collect();
    let mut order = vec![0usize];
    let mut current = 0usize;
    while !unused.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for &candidate in &unused {
            let d = dist[current][candidate];
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((candidate, d));
            }
        }
        let (next, _) = best.expect("unused is non-empty");
        order.push(next);
        current = next;
        unused.retain(|&u| u != next);
    }
    order.push(n - 1);

    // Endpoint-fixed 2-opt: reverse middle sub-ranges while it helps
    let m = order.len();
    for _ in 0..MAX_OPT_PASSES {
        let mut improved = false;
        for i in 1..(m - 2) {
            for k in (i + 1)..(m - 1) {
                let a = order[i - 1];
                let b = order[i];
                let c = order[k];
                let d = order[k + 1];
                let delta = dist[a][c] + dist[b][d] - dist[a][b] - dist[c][d];
                if delta < -IMPROVEMENT_EPSILON {
                    order[i..=k].reverse();
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
    order
}

/// Total length of a tour through the matrix
pub fn tour_length(dist: &[Vec<f64>], order: &[usize]) -> f64 {
    order.windows(2).map(|w| dist[w[0]][w[1]]).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Point2D;

    /// Symmetric matrix of straight-line distances between the points
    fn euclidean_matrix(points: &[Point2D]) -> Vec<Vec<f64>> {
        let n = points.len();
        let mut dist = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                dist[i][j] = points[i].distance(&points[j]);
            }
        }
        dist
    }

    #[test]
    fn test_identity_for_small_inputs() {
        let two = euclidean_matrix(&[Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)]);
        assert_eq!(optimize_stop_order(&two), vec![0, 1]);

        let three = euclidean_matrix(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(50.0, 0.0),
            Point2D::new(10.0, 0.0),
        ]);
        assert_eq!(optimize_stop_order(&three), vec![0, 1, 2]);
    }

    #[test]
    fn test_closer_stop_visited_first() {
        // B (index 2) is closer to the entrance than A (index 1)
        let dist = euclidean_matrix(&[
            Point2D::new(0.0, 0.0),    // entrance
            Point2D::new(80.0, 0.0),   // A
            Point2D::new(20.0, 0.0),   // B
            Point2D::new(100.0, 0.0),  // exit
        ]);
        assert_eq!(optimize_stop_order(&dist), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_endpoints_never_move() {
        let points: Vec<Point2D> = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(30.0, 40.0),
            Point2D::new(90.0, 10.0),
            Point2D::new(15.0, 70.0),
            Point2D::new(60.0, 60.0),
            Point2D::new(100.0, 100.0),
        ];
        let dist = euclidean_matrix(&points);
        let order = optimize_stop_order(&dist);
        assert_eq!(order[0], 0);
        assert_eq!(*order.last().unwrap(), points.len() - 1);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..points.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_two_opt_does_not_worsen_nearest_neighbor() {
        // Zig-zag layout that tempts nearest-neighbor into a crossing tour
        let points: Vec<Point2D> = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 50.0),
            Point2D::new(12.0, 0.0),
            Point2D::new(20.0, 50.0),
            Point2D::new(22.0, 0.0),
            Point2D::new(30.0, 25.0),
        ];
        let dist = euclidean_matrix(&points);

        // Replicate the nearest-neighbor seed by hand
        let n = dist.len();
        let mut unused: Vec<usize> = (1..n - 1).collect();
        let mut seed = vec![0usize];
        let mut current = 0usize;
        while !unused.is_empty() {
            let mut best: Option<(usize, f64)> = None;
            for &candidate in &unused {
                let d = dist[current][candidate];
                if best.map_or(true, |(_, best_d)| d < best_d) {
                    best = Some((candidate, d));
                }
            }
            let (next, _) = best.unwrap();
            seed.push(next);
            current = next;
            unused.retain(|&u| u != next);
        }
        seed.push(n - 1);

        let optimized = optimize_stop_order(&dist);
        assert!(tour_length(&dist, &optimized) <= tour_length(&dist, &seed) + 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let dist = euclidean_matrix(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 10.0), // duplicate stop: ties must not flap
            Point2D::new(5.0, 80.0),
            Point2D::new(0.0, 100.0),
        ]);
        assert_eq!(optimize_stop_order(&dist), optimize_stop_order(&dist));
    }
}
