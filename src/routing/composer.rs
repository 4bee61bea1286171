//! Route composition
//!
//! Stitches per-segment refined paths into one continuous route, tracks
//! the arc-length fraction at which each stop is reached and converts the
//! total length into real-world distance and time estimates.

use itertools::Itertools;

use crate::common::error::{RoutingError, RoutingResult};
use crate::common::types::{Obstacle, Point2D, Route, Waypoint};
use crate::grid::occupancy::OccupancyGrid;
use crate::path_planning::refine::RefineConfig;
use crate::routing::planner::find_path_or_fallback;

/// Fixed floor-plan scale: how many pixels make one meter
pub const PIXELS_PER_METER: f64 = 50.0;

/// Average shopper walking speed in meters per second
pub const WALKING_SPEED_M_PER_S: f64 = 1.4;

/// Build a route through `waypoints` in the given visiting order
///
/// Consecutive stops are connected with refined paths (or their fallbacks;
/// the composer always produces a usable route). The duplicated junction
/// point between segments is dropped while stitching.
pub fn compose_route(
    grid: &OccupancyGrid,
    obstacles: &[Obstacle],
    waypoints: &[Waypoint],
    refine_config: &RefineConfig,
) -> RoutingResult<Route> {
    if waypoints.len() < 2 {
        return Err(RoutingError::DegenerateInput(format!(
            "route needs at least 2 waypoints, got {}",
            waypoints.len()
        )));
    }

    let mut points: Vec<Point2D> = Vec::new();
    // Index into `points` where each waypoint is reached
    let mut boundaries = vec![0usize];

    for (from, to) in waypoints.iter().tuple_windows() {
        let segment =
            find_path_or_fallback(grid, obstacles, from.position(), to.position(), refine_config);
        if points.is_empty() {
            points.extend_from_slice(&segment.points);
        } else {
            points.extend_from_slice(&segment.points[1..]);
        }
        boundaries.push(points.len() - 1);
    }

    // Cumulative arc length at every point of the stitched polyline
    let mut cumulative = Vec::with_capacity(points.len());
    let mut running = 0.0;
    cumulative.push(0.0);
    for (a, b) in points.iter().tuple_windows() {
        running += a.distance(b);
        cumulative.push(running);
    }
    let total = running;

    let waypoint_progress: Vec<f64> = if total > f64::EPSILON {
        boundaries.iter().map(|&idx| cumulative[idx] / total).collect()
    } else {
        // Zero-length route (all stops on one spot): spread fractions evenly
        let last = (waypoints.len() - 1) as f64;
        (0..waypoints.len()).map(|i| i as f64 / last).collect()
    };

    let distance_meters = total / PIXELS_PER_METER;
    let time_minutes = (distance_meters / (WALKING_SPEED_M_PER_S * 60.0)).ceil();

    Ok(Route {
        points,
        waypoints: waypoints.to_vec(),
        waypoint_progress,
        distance_meters,
        time_minutes,
    })
}
