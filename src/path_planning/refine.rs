//! Raw grid path refinement
//!
//! A* output follows cell centers and looks robotic: staircase diagonals,
//! wall-hugging corners, single-cell wobbles. The refiner post-processes a
//! raw cell path into a visually natural polyline while keeping it
//! obstacle-safe, in a fixed pipeline:
//!
//! 1. straighten (line-of-sight shortcutting)
//! 2. center-in-corridor
//! 3. de-jitter
//! 4. simplify collinear runs
//! 5. re-straighten
//! 6. obstacle-safety repair
//!
//! The final stage re-verifies every segment against the clearance-padded
//! obstacle rectangles and bridges unsafe segments with a fresh A* search.
//! If a segment cannot be repaired the refiner returns the raw path mapped
//! to floor coordinates instead; refinement never trades safety for looks.

use itertools::Itertools;

use crate::common::error::{RoutingError, RoutingResult};
use crate::common::geometry::segment_is_safe;
use crate::common::types::{GridCell, Obstacle, PathKind, PlannedPath, Point2D};
use crate::grid::occupancy::OccupancyGrid;
use crate::path_planning::a_star::find_grid_path;

/// Tuning knobs for the refinement pipeline
#[derive(Debug, Clone)]
pub struct RefineConfig {
    /// Maximum straightening passes before giving up on convergence
    pub straighten_passes: usize,
    /// How many cells to scan sideways for corridor walls
    pub corridor_scan_radius: i32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            straighten_passes: 3,
            corridor_scan_radius: 4,
        }
    }
}

/// Refine a raw A* cell path into an obstacle-safe floor-plan polyline
///
/// `start` and `end` are the exact floor-plan points the caller asked for;
/// they replace the first and last cell centers so the path begins and ends
/// where the shopper actually stands.
pub fn refine_path(
    raw: &[GridCell],
    grid: &OccupancyGrid,
    obstacles: &[Obstacle],
    start: Point2D,
    end: Point2D,
    config: &RefineConfig,
) -> PlannedPath {
    if raw.is_empty() {
        return PlannedPath::new(vec![start, end], PathKind::StraightLine);
    }

    let mut cells = raw.to_vec();
    cells = straighten(cells, grid, config.straighten_passes);
    center_in_corridor(&mut cells, grid, config.corridor_scan_radius);
    dejitter(&mut cells, grid);
    let cells = simplify(&cells);
    let cells = los_simplify(&cells, grid);

    let points = to_floor_points(&cells, grid, start, end);
    match repair_segments(points, grid, obstacles) {
        Ok(points) => PlannedPath::new(points, PathKind::Refined),
        Err(_) => {
            let fallback = to_floor_points(raw, grid, start, end);
            PlannedPath::new(fallback, PathKind::RawGrid)
        }
    }
}

/// Map a cell path to floor coordinates, substituting the exact endpoints
fn to_floor_points(
    cells: &[GridCell],
    grid: &OccupancyGrid,
    start: Point2D,
    end: Point2D,
) -> Vec<Point2D> {
    if cells.len() < 2 {
        return vec![start, end];
    }
    let mut points: Vec<Point2D> = cells.iter().map(|&c| grid.center_of(c)).collect();
    points[0] = start;
    let last = points.len() - 1;
    points[last] = end;
    points
}

/// Cells along a grid line between two cells, endpoints included (Bresenham)
fn bresenham_cells(from: GridCell, to: GridCell) -> Vec<GridCell> {
    let mut cells = Vec::new();
    let mut x = from.gx;
    let mut y = from.gy;
    let dx = (to.gx - from.gx).abs();
    let dy = (to.gy - from.gy).abs();
    let sx = if from.gx < to.gx { 1 } else { -1 };
    let sy = if from.gy < to.gy { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        cells.push(GridCell::new(x, y));
        if x == to.gx && y == to.gy {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// True when every cell on the line between `from` and `to` is walkable
fn line_of_sight(grid: &OccupancyGrid, from: GridCell, to: GridCell) -> bool {
    bresenham_cells(from, to).iter().all(|&c| grid.is_walkable(c))
}

/// Greedy line-of-sight vertex elimination
///
/// Keeps the first vertex, repeatedly jumps to the farthest vertex still
/// visible over walkable cells, and drops everything in between.
fn los_simplify(cells: &[GridCell], grid: &OccupancyGrid) -> Vec<GridCell> {
    if cells.len() <= 2 {
        return cells.to_vec();
    }
    let mut out = vec![cells[0]];
    let mut i = 0;
    let last = cells.len() - 1;
    while i < last {
        let mut next = i + 1;
        for j in (i + 1..=last).rev() {
            if line_of_sight(grid, cells[i], cells[j]) {
                next = j;
                break;
            }
        }
        out.push(cells[next]);
        i = next;
    }
    out
}

/// Re-rasterize a sparse vertex path into a dense cell path
fn densify(vertices: &[GridCell]) -> Vec<GridCell> {
    let mut cells = Vec::new();
    for (i, pair) in vertices.windows(2).enumerate() {
        let line = bresenham_cells(pair[0], pair[1]);
        let skip = if i == 0 { 0 } else { 1 };
        cells.extend_from_slice(&line[skip..]);
    }
    if cells.is_empty() {
        cells = vertices.to_vec();
    }
    cells
}

/// Iterative line-of-sight straightening, kept dense for later stages
fn straighten(mut cells: Vec<GridCell>, grid: &OccupancyGrid, passes: usize) -> Vec<GridCell> {
    for _ in 0..passes {
        let next = densify(&los_simplify(&cells, grid));
        if next == cells {
            break;
        }
        cells = next;
    }
    cells
}

/// Shift straight-run vertices toward the middle of their corridor
///
/// For every vertex whose neighbors continue in the same direction, scan
/// perpendicular to the travel direction for the nearest wall on each side.
/// When both walls are within the scan radius the vertex moves toward the
/// midpoint, provided every cell along the shift is walkable.
fn center_in_corridor(cells: &mut Vec<GridCell>, grid: &OccupancyGrid, scan_radius: i32) {
    if cells.len() < 3 {
        return;
    }
    let snapshot = cells.clone();
    for k in 1..snapshot.len() - 1 {
        let prev = snapshot[k - 1];
        let cell = snapshot[k];
        let next = snapshot[k + 1];

        let dir = (cell.gx - prev.gx, cell.gy - prev.gy);
        let dir_out = (next.gx - cell.gx, next.gy - cell.gy);
        if dir != dir_out || dir == (0, 0) {
            continue;
        }

        // Perpendicular to the direction of travel
        let perp = (-dir.1, dir.0);
        let wall_distance = |sign: i32| -> Option<i32> {
            (1..=scan_radius).find(|&step| {
                !grid.is_walkable(GridCell::new(
                    cell.gx + perp.0 * step * sign,
                    cell.gy + perp.1 * step * sign,
                ))
            })
        };

        let plus = match wall_distance(1) {
            Some(d) => d,
            None => continue,
        };
        let minus = match wall_distance(-1) {
            Some(d) => d,
            None => continue,
        };

        let shift = (plus - minus) / 2;
        if shift == 0 {
            continue;
        }
        let sign = shift.signum();
        let reachable = (1..=shift.abs()).all(|step| {
            grid.is_walkable(GridCell::new(
                cell.gx + perp.0 * step * sign,
                cell.gy + perp.1 * step * sign,
            ))
        });
        if reachable {
            cells[k] = GridCell::new(cell.gx + perp.0 * shift, cell.gy + perp.1 * shift);
        }
    }
}

/// Snap single-cell lateral wobbles back onto the run their neighbors share
fn dejitter(cells: &mut Vec<GridCell>, grid: &OccupancyGrid) {
    if cells.len() < 3 {
        return;
    }
    for k in 1..cells.len() - 1 {
        let prev = cells[k - 1];
        let cell = cells[k];
        let next = cells[k + 1];

        if prev.gy == next.gy && (cell.gy - prev.gy).abs() == 1 {
            let snapped = GridCell::new(cell.gx, prev.gy);
            if grid.is_walkable(snapped) {
                cells[k] = snapped;
            }
        } else if prev.gx == next.gx && (cell.gx - prev.gx).abs() == 1 {
            let snapped = GridCell::new(prev.gx, cell.gy);
            if grid.is_walkable(snapped) {
                cells[k] = snapped;
            }
        }
    }
}

/// Merge consecutive collinear steps into single segments
fn simplify(cells: &[GridCell]) -> Vec<GridCell> {
    let deduped: Vec<GridCell> = cells.iter().copied().dedup().collect();
    if deduped.len() <= 2 {
        return deduped;
    }
    let mut out = vec![deduped[0]];
    for k in 1..deduped.len() - 1 {
        let prev = deduped[k - 1];
        let cell = deduped[k];
        let next = deduped[k + 1];
        let incoming = (cell.gx - prev.gx, cell.gy - prev.gy);
        let outgoing = (next.gx - cell.gx, next.gy - cell.gy);
        if incoming != outgoing {
            out.push(cell);
        }
    }
    out.push(*deduped.last().unwrap());
    out
}

/// Verify every segment against the padded obstacles, bridging unsafe ones
/// with a fresh A* search between just their endpoints
fn repair_segments(
    points: Vec<Point2D>,
    grid: &OccupancyGrid,
    obstacles: &[Obstacle],
) -> RoutingResult<Vec<Point2D>> {
    let clearance = grid.clearance();
    let mut out = vec![points[0]];

    for (a, b) in points.iter().copied().tuple_windows() {
        if segment_is_safe(a, b, obstacles, clearance) {
            out.push(b);
            continue;
        }

        let bridge = find_grid_path(grid, grid.cell_of(a), grid.cell_of(b))
            .map_err(|_| RoutingError::RefinementUnsafe)?;
        let mut candidate = vec![a];
        if bridge.len() > 2 {
            candidate.extend(bridge[1..bridge.len() - 1].iter().map(|&c| grid.center_of(c)));
        }
        candidate.push(b);

        let all_safe = candidate
            .iter()
            .copied()
            .tuple_windows()
            .all(|(p, q)| segment_is_safe(p, q, obstacles, clearance));
        if !all_safe {
            return Err(RoutingError::RefinementUnsafe);
        }
        out.extend_from_slice(&candidate[1..]);
    }
    Ok(out)
}
