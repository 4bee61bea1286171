//! store_router - obstacle-aware route planning for store floor plans
//!
//! Given a floor plan with rectangular obstacles (shelves, walls, counters,
//! checkouts) and a set of named stops, this crate computes a walkable
//! route: rasterize the floor into an occupancy grid, search with A*,
//! refine the raw path into a natural-looking and still obstacle-safe
//! polyline, order the stops for a short walk and stitch everything into
//! one route with distance and time estimates.
//!
//! All inputs and outputs are in floor-plan pixel coordinates (Y-down);
//! only the route summary converts to meters and minutes.

// Core modules
pub mod common;
pub mod grid;

// Algorithm modules
pub mod path_planning;
pub mod routing;

// Re-export common types for convenience
pub use common::{GridCell, Obstacle, PathKind, PlannedPath, Point2D, Route, Waypoint};
pub use common::{PathPlanner, RouteBuilder, RoutingError, RoutingResult};
pub use grid::{GridBuilder, OccupancyGrid};
pub use path_planning::{catmull_rom, RefineConfig};
pub use routing::{build_route, find_path, find_path_or_fallback, PlannerConfig, RoutePlanner};
