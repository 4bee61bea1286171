//! Error types for store_router

use std::fmt;

use crate::common::types::GridCell;

/// Main error type for route planning
///
/// Every variant except `DegenerateInput` is a recoverable condition: the
/// caller (or the engine's own fallback path) can degrade to a straight-line
/// segment or to the unrefined grid path. `DegenerateInput` is a caller
/// programming error and is rejected before any computation starts.
#[derive(Debug)]
pub enum RoutingError {
    /// Start or end cell is blocked or outside the grid
    PointNotWalkable(GridCell),
    /// A* exhausted the open set without reaching the goal
    NoPathFound,
    /// Refinement could not keep a segment obstacle-safe
    RefinementUnsafe,
    /// Fewer than 2 waypoints, non-positive obstacle size or cell size
    DegenerateInput(String),
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::PointNotWalkable(cell) => {
                write!(f, "point not walkable: cell ({}, {})", cell.gx, cell.gy)
            }
            RoutingError::NoPathFound => write!(f, "no path found"),
            RoutingError::RefinementUnsafe => write!(f, "refinement could not stay obstacle-safe"),
            RoutingError::DegenerateInput(msg) => write!(f, "degenerate input: {}", msg),
        }
    }
}

impl std::error::Error for RoutingError {}

/// Result type alias for route planning operations
pub type RoutingResult<T> = Result<T, RoutingError>;
