//! Catmull-Rom polyline smoothing
//!
//! Densifies a refined route polyline into a smooth curve for rendering.
//! The curve passes through every control point, so waypoint markers stay
//! on the drawn path. Purely cosmetic: obstacle safety is guaranteed by the
//! refiner upstream and is never re-checked here.

use nalgebra::Vector2;

use crate::common::types::Point2D;

/// Interpolated points inserted per input segment
pub const DEFAULT_SAMPLES_PER_SEGMENT: usize = 8;

/// Sample the Catmull-Rom spline through `points`
///
/// Each interior segment is interpolated from the four surrounding control
/// points; at the ends the first/last point doubles as its own neighbor.
/// Polylines with fewer than 3 points are returned unchanged.
pub fn catmull_rom(points: &[Point2D], samples_per_segment: usize) -> Vec<Point2D> {
    if points.len() < 3 || samples_per_segment == 0 {
        return points.to_vec();
    }

    let control = |i: isize| -> Vector2<f64> {
        let clamped = i.max(0).min(points.len() as isize - 1) as usize;
        points[clamped].to_vector()
    };

    let mut out = vec![points[0]];
    for i in 0..points.len() - 1 {
        let p0 = control(i as isize - 1);
        let p1 = control(i as isize);
        let p2 = control(i as isize + 1);
        let p3 = control(i as isize + 2);

        for s in 1..=samples_per_segment {
            let t = s as f64 / samples_per_segment as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            // Standard cubic Catmull-Rom basis
            let sample = 0.5
                * (2.0 * p1
                    + (p2 - p0) * t
                    + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                    + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3);
            out.push(Point2D::from(sample));
        }
    }
    out
}
