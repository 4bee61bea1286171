//! Common types, errors and traits

pub mod error;
pub mod geometry;
pub mod traits;
pub mod types;

pub use error::{RoutingError, RoutingResult};
pub use traits::{PathPlanner, RouteBuilder};
pub use types::{
    polyline_length, GridCell, Obstacle, PathKind, PlannedPath, Point2D, Route, Waypoint,
};
