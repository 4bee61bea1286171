//! Segment and rectangle intersection tests
//!
//! Used by the path refiner's safety stage to verify that no path segment
//! crosses a clearance-padded obstacle rectangle.

use crate::common::types::{Obstacle, Point2D};

/// Axis-aligned rectangle in floor-plan pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Obstacle rectangle expanded by the clearance margin on all sides
    pub fn from_obstacle_padded(obstacle: &Obstacle, clearance: f64) -> Self {
        Self {
            min_x: obstacle.x - clearance,
            min_y: obstacle.y - clearance,
            max_x: obstacle.x + obstacle.width + clearance,
            max_y: obstacle.y + obstacle.height + clearance,
        }
    }

    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(self.min_x, self.min_y),
            Point2D::new(self.max_x, self.min_y),
            Point2D::new(self.max_x, self.max_y),
            Point2D::new(self.min_x, self.max_y),
        ]
    }
}

/// Test whether two line segments intersect (inclusive of endpoints)
///
/// Parametric line intersection; parallel segments report false and are
/// covered by the endpoint containment checks in `segment_intersects_rect`.
pub fn segments_intersect(a1: Point2D, a2: Point2D, b1: Point2D, b2: Point2D) -> bool {
    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denominator == 0.0 {
        return false;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denominator;
    if ua < 0.0 || ua > 1.0 {
        return false;
    }

    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denominator;
    ub >= 0.0 && ub <= 1.0
}

/// Test whether a segment touches a rectangle
///
/// True when either endpoint lies inside the rectangle or the segment
/// crosses one of its four edges.
pub fn segment_intersects_rect(p1: Point2D, p2: Point2D, rect: &Rect) -> bool {
    if rect.contains(p1) || rect.contains(p2) {
        return true;
    }

    let c = rect.corners();
    for i in 0..4 {
        if segments_intersect(p1, p2, c[i], c[(i + 1) % 4]) {
            return true;
        }
    }
    false
}

/// Test a segment against every padded obstacle rectangle
pub fn segment_is_safe(p1: Point2D, p2: Point2D, obstacles: &[Obstacle], clearance: f64) -> bool {
    obstacles.iter().all(|obstacle| {
        let rect = Rect::from_obstacle_padded(obstacle, clearance);
        !segment_intersects_rect(p1, p2, &rect)
    })
}
