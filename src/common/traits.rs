//! Common traits defining interfaces for route planning

use crate::common::error::RoutingResult;
use crate::common::types::{PlannedPath, Point2D, Route, Waypoint};

/// Trait for point-to-point path planning
pub trait PathPlanner {
    /// Plan an obstacle-safe path from start to goal
    fn plan(&self, start: Point2D, goal: Point2D) -> RoutingResult<PlannedPath>;
}

/// Trait for multi-stop route planning
pub trait RouteBuilder {
    /// Build a complete route visiting the given stops, reordering the
    /// middle stops for a shorter walk while keeping first and last fixed
    fn route(&self, waypoints: &[Waypoint]) -> RoutingResult<Route>;
}
