//! Common types used throughout store_router
//!
//! All spatial values are in floor-plan pixel coordinates (Y grows
//! downward, matching the floor-plan editor). Conversions to meters and
//! minutes happen only in the route summary.

use nalgebra::Vector2;

/// 2D point in floor-plan pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Cell coordinates on the occupancy grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub gx: i32,
    pub gy: i32,
}

impl GridCell {
    pub fn new(gx: i32, gy: i32) -> Self {
        Self { gx, gy }
    }
}

/// Axis-aligned rectangular obstacle (shelf, wall, counter, checkout)
///
/// `kind` is an opaque label supplied by the floor-plan source; the engine
/// passes it through without attaching behavior to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: String,
}

impl Obstacle {
    pub fn new(id: u64, x: f64, y: f64, width: f64, height: f64, kind: &str) -> Self {
        Self { id, x, y, width, height, kind: kind.to_string() }
    }
}

/// Named stop on a shopping route
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub category_id: Option<u32>,
    pub commodities: Vec<String>,
}

impl Waypoint {
    pub fn new(name: &str, x: f64, y: f64) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            category_id: None,
            commodities: Vec::new(),
        }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// How a planned path was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Full refinement pipeline succeeded
    Refined,
    /// Refinement could not be kept obstacle-safe; raw grid path returned
    RawGrid,
    /// No grid path existed; straight segment between the endpoints
    StraightLine,
}

/// Obstacle-safe walkable path between two floor-plan points
#[derive(Debug, Clone)]
pub struct PlannedPath {
    pub points: Vec<Point2D>,
    pub kind: PathKind,
}

impl PlannedPath {
    pub fn new(points: Vec<Point2D>, kind: PathKind) -> Self {
        Self { points, kind }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Euclidean arc length of the polyline in pixels
    pub fn length(&self) -> f64 {
        polyline_length(&self.points)
    }
}

/// Complete multi-stop route returned to the presentation layer
///
/// `waypoints` holds the stops in final visiting order and
/// `waypoint_progress[i]` is the arc-length fraction (0..1) at which stop
/// `i` is reached, so a caller can split the route into covered and
/// remaining portions at any point.
#[derive(Debug, Clone)]
pub struct Route {
    pub points: Vec<Point2D>,
    pub waypoints: Vec<Waypoint>,
    pub waypoint_progress: Vec<f64>,
    pub distance_meters: f64,
    pub time_minutes: f64,
}

impl Route {
    /// Arc length of the stitched polyline in pixels
    pub fn length(&self) -> f64 {
        polyline_length(&self.points)
    }
}

/// Euclidean arc length of a polyline in pixels
pub fn polyline_length(points: &[Point2D]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_planned_path_length() {
        let path = PlannedPath::new(
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(1.0, 0.0),
                Point2D::new(1.0, 1.0),
            ],
            PathKind::Refined,
        );
        assert!((path.length() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_waypoint_position() {
        let wp = Waypoint::new("Dairy", 120.0, 40.0);
        assert_eq!(wp.position(), Point2D::new(120.0, 40.0));
        assert!(wp.commodities.is_empty());
    }

    #[test]
    fn test_polyline_length_short_inputs() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[Point2D::origin()]), 0.0);
    }
}
