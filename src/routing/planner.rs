//! Planning session facade
//!
//! Ties the grid, pathfinder, refiner and optimizer together behind the
//! three call shapes the hosting application uses: build a grid, find a
//! path between two points, build a multi-stop route. A `RoutePlanner`
//! owns one immutable grid snapshot per obstacle set; changing obstacles
//! rebuilds the grid whole before the next request (rebuild-then-swap —
//! concurrent rebuild-while-querying is the caller's problem to serialize).

use crate::common::error::{RoutingError, RoutingResult};
use crate::common::traits::{PathPlanner, RouteBuilder};
use crate::common::types::{Obstacle, PathKind, PlannedPath, Point2D, Route, Waypoint};
use crate::grid::occupancy::{GridBuilder, OccupancyGrid};
use crate::path_planning::a_star::find_grid_path;
use crate::path_planning::refine::{refine_path, RefineConfig};
use crate::routing::composer::compose_route;
use crate::routing::stop_order::{distance_matrix, optimize_stop_order};

/// Grid and refinement tuning for one planning session
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Grid cell size in pixels
    pub cell_size: f64,
    /// Obstacle padding in pixels, keeps paths off the shelves
    pub clearance_margin: f64,
    pub refine: RefineConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            clearance_margin: 8.0,
            refine: RefineConfig::default(),
        }
    }
}

/// Find a refined path between two floor-plan points
///
/// Fails with `PointNotWalkable`/`NoPathFound`; both are recoverable and
/// `find_path_or_fallback` applies the standard straight-line fallback.
pub fn find_path(
    grid: &OccupancyGrid,
    obstacles: &[Obstacle],
    start: Point2D,
    end: Point2D,
    refine_config: &RefineConfig,
) -> RoutingResult<PlannedPath> {
    let raw = find_grid_path(grid, grid.cell_of(start), grid.cell_of(end))?;
    Ok(refine_path(&raw, grid, obstacles, start, end, refine_config))
}

/// `find_path` with the straight-line fallback applied
///
/// Never fails: when no walkable path exists the straight segment between
/// the endpoints is returned, tagged `PathKind::StraightLine` so the
/// presentation layer can show it as approximate.
pub fn find_path_or_fallback(
    grid: &OccupancyGrid,
    obstacles: &[Obstacle],
    start: Point2D,
    end: Point2D,
    refine_config: &RefineConfig,
) -> PlannedPath {
    match find_path(grid, obstacles, start, end, refine_config) {
        Ok(path) => path,
        Err(_) => PlannedPath::new(vec![start, end], PathKind::StraightLine),
    }
}

/// Build a complete route: optimize the visiting order, then compose
///
/// The first and last waypoints (entrance and exit) keep their positions;
/// the stops between them are reordered to shorten the walk. Two-waypoint
/// requests skip the optimizer entirely.
pub fn build_route(
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
    if waypoints.len() == 2 {
        return compose_route(grid, obstacles, waypoints, refine_config);
    }

    let dist = distance_matrix(grid, obstacles, waypoints, refine_config);
    let order = optimize_stop_order(&dist);
    let ordered: Vec<Waypoint> = order.iter().map(|&i| waypoints[i].clone()).collect();
    compose_route(grid, obstacles, &ordered, refine_config)
}

/// One store, one obstacle snapshot, many route requests
pub struct RoutePlanner {
    floor_width: f64,
    floor_height: f64,
    config: PlannerConfig,
    obstacles: Vec<Obstacle>,
    grid: OccupancyGrid,
}

impl RoutePlanner {
    pub fn new(
        floor_width: f64,
        floor_height: f64,
        config: PlannerConfig,
        obstacles: Vec<Obstacle>,
    ) -> RoutingResult<Self> {
        let grid = GridBuilder::new(
            floor_width,
            floor_height,
            config.cell_size,
            config.clearance_margin,
        )
        .build(&obstacles)?;
        Ok(Self {
            floor_width,
            floor_height,
            config,
            obstacles,
            grid,
        })
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Replace the obstacle snapshot and rebuild the grid
    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) -> RoutingResult<()> {
        let grid = GridBuilder::new(
            self.floor_width,
            self.floor_height,
            self.config.cell_size,
            self.config.clearance_margin,
        )
        .build(&obstacles)?;
        self.obstacles = obstacles;
        self.grid = grid;
        Ok(())
    }

    /// `find_path` with the straight-line fallback
    pub fn plan_or_fallback(&self, start: Point2D, goal: Point2D) -> PlannedPath {
        find_path_or_fallback(&self.grid, &self.obstacles, start, goal, &self.config.refine)
    }
}

impl PathPlanner for RoutePlanner {
    fn plan(&self, start: Point2D, goal: Point2D) -> RoutingResult<PlannedPath> {
        find_path(&self.grid, &self.obstacles, start, goal, &self.config.refine)
    }
}

impl RouteBuilder for RoutePlanner {
    fn route(&self, waypoints: &[Waypoint]) -> RoutingResult<Route> {
        build_route(&self.grid, &self.obstacles, waypoints, &self.config.refine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 400x300 store with a shelf block in the middle and a checkout row
    fn store_planner() -> RoutePlanner {
        let obstacles = vec![
            Obstacle::new(1, 160.0, 60.0, 80.0, 120.0, "shelf"),
            Obstacle::new(2, 60.0, 240.0, 120.0, 30.0, "checkout"),
        ];
        RoutePlanner::new(400.0, 300.0, PlannerConfig::default(), obstacles).unwrap()
    }

    #[test]
    fn test_plan_around_shelf() {
        let planner = store_planner();
        let path = planner
            .plan(Point2D::new(40.0, 120.0), Point2D::new(360.0, 120.0))
            .unwrap();
        assert_eq!(path.points[0], Point2D::new(40.0, 120.0));
        assert_eq!(*path.points.last().unwrap(), Point2D::new(360.0, 120.0));
        // The shelf sits on the straight line, so the walk is longer
        assert!(path.length() > 320.0);
    }

    #[test]
    fn test_blocked_start_is_typed_failure() {
        let planner = store_planner();
        // Inside the shelf block
        let result = planner.plan(Point2D::new(200.0, 120.0), Point2D::new(360.0, 120.0));
        assert!(matches!(result, Err(RoutingError::PointNotWalkable(_))));
        // And the fallback still hands back a drawable segment
        let fallback =
            planner.plan_or_fallback(Point2D::new(200.0, 120.0), Point2D::new(360.0, 120.0));
        assert_eq!(fallback.kind, PathKind::StraightLine);
        assert_eq!(fallback.points.len(), 2);
    }

    #[test]
    fn test_route_reorders_closer_stop_first() {
        let planner = store_planner();
        // B is right next to the entrance, A is across the store
        let stops = vec![
            Waypoint::new("Entrance", 20.0, 20.0),
            Waypoint::new("A", 360.0, 260.0),
            Waypoint::new("B", 60.0, 60.0),
            Waypoint::new("Exit", 380.0, 20.0),
        ];
        let route = planner.route(&stops).unwrap();
        let names: Vec<&str> = route.waypoints.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Entrance"));
        assert_eq!(names.last(), Some(&"Exit"));
        let a_pos = names.iter().position(|&n| n == "A").unwrap();
        let b_pos = names.iter().position(|&n| n == "B").unwrap();
        assert!(b_pos < a_pos, "closer stop should be visited first");
    }

    #[test]
    fn test_two_stop_route_skips_optimizer() {
        let planner = store_planner();
        let stops = vec![
            Waypoint::new("Entrance", 20.0, 20.0),
            Waypoint::new("Exit", 380.0, 20.0),
        ];
        let route = planner.route(&stops).unwrap();
        assert_eq!(route.waypoints.len(), 2);
        assert_eq!(route.waypoint_progress, vec![0.0, 1.0]);
    }

    #[test]
    fn test_degenerate_waypoint_count_rejected() {
        let planner = store_planner();
        assert!(matches!(
            planner.route(&[Waypoint::new("Entrance", 20.0, 20.0)]),
            Err(RoutingError::DegenerateInput(_))
        ));
        assert!(matches!(
            planner.route(&[]),
            Err(RoutingError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_set_obstacles_rebuilds_grid() {
        let mut planner = store_planner();
        let before = planner
            .plan(Point2D::new(40.0, 120.0), Point2D::new(360.0, 120.0))
            .unwrap();
        // Clearing the floor opens the straight line
        planner.set_obstacles(Vec::new()).unwrap();
        let after = planner
            .plan(Point2D::new(40.0, 120.0), Point2D::new(360.0, 120.0))
            .unwrap();
        assert!(after.length() < before.length());
        assert!((after.length() - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_route_is_deterministic() {
        let planner = store_planner();
        let stops = vec![
            Waypoint::new("Entrance", 20.0, 20.0),
            Waypoint::new("Deli", 300.0, 220.0),
            Waypoint::new("Bakery", 60.0, 200.0),
            Waypoint::new("Frozen", 340.0, 80.0),
            Waypoint::new("Exit", 380.0, 20.0),
        ];
        let a = planner.route(&stops).unwrap();
        let b = planner.route(&stops).unwrap();
        assert_eq!(a.points, b.points);
        assert_eq!(a.waypoint_progress, b.waypoint_progress);
    }
}
