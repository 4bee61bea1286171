//! Occupancy grid built from a floor plan and its obstacle rectangles
//!
//! The continuous floor plan is rasterized into walkable/blocked cells.
//! Obstacles are padded by the clearance margin before rasterization so
//! planned paths keep a buffer from shelves and walls. The grid is built
//! once per obstacle snapshot and is read-only afterwards; route queries
//! share it without mutating it.

use std::collections::{HashSet, VecDeque};

use crate::common::error::{RoutingError, RoutingResult};
use crate::common::geometry::Rect;
use crate::common::types::{GridCell, Obstacle, Point2D};

/// Binary walkable/blocked grid over the floor plan
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    cell_size: f64,
    clearance: f64,
    walkable: Vec<bool>,
}

/// Builder for [`OccupancyGrid`]
///
/// By default the whole floor starts walkable and obstacles carve blocked
/// cells out of it. With an explicit walkable-area whitelist the floor
/// starts blocked and only the whitelisted rectangles open up.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    floor_width: f64,
    floor_height: f64,
    cell_size: f64,
    clearance: f64,
    walkable_areas: Vec<Rect>,
}

impl GridBuilder {
    pub fn new(floor_width: f64, floor_height: f64, cell_size: f64, clearance: f64) -> Self {
        Self {
            floor_width,
            floor_height,
            cell_size,
            clearance,
            walkable_areas: Vec::new(),
        }
    }

    pub fn with_walkable_areas(mut self, areas: &[Rect]) -> Self {
        self.walkable_areas = areas.to_vec();
        self
    }

    /// Rasterize the obstacle set into an occupancy grid
    ///
    /// Obstacles are processed independently; order does not matter and
    /// overlapping obstacles simply union their blocked cells. Obstacles
    /// lying outside the floor bounds are skipped cell by cell.
    pub fn build(&self, obstacles: &[Obstacle]) -> RoutingResult<OccupancyGrid> {
        if self.cell_size <= 0.0 {
            return Err(RoutingError::DegenerateInput(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.floor_width <= 0.0 || self.floor_height <= 0.0 {
            return Err(RoutingError::DegenerateInput(format!(
                "floor must have positive size, got {}x{}",
                self.floor_width, self.floor_height
            )));
        }
        for obstacle in obstacles {
            if obstacle.width <= 0.0 || obstacle.height <= 0.0 {
                return Err(RoutingError::DegenerateInput(format!(
                    "obstacle {} must have positive size, got {}x{}",
                    obstacle.id, obstacle.width, obstacle.height
                )));
            }
        }

        let width = (self.floor_width / self.cell_size).ceil() as i32;
        let height = (self.floor_height / self.cell_size).ceil() as i32;

        let whole_floor_walkable = self.walkable_areas.is_empty();
        let mut grid = OccupancyGrid {
            width,
            height,
            cell_size: self.cell_size,
            clearance: self.clearance,
            walkable: vec![whole_floor_walkable; (width * height) as usize],
        };

        for area in &self.walkable_areas {
            grid.fill_rect(area, true);
        }
        for obstacle in obstacles {
            let padded = Rect::from_obstacle_padded(obstacle, self.clearance);
            grid.fill_rect(&padded, false);
        }

        Ok(grid)
    }
}

impl OccupancyGrid {
    /// Mark every cell covered by `rect`, skipping out-of-bounds cells
    fn fill_rect(&mut self, rect: &Rect, value: bool) {
        let gx0 = (rect.min_x / self.cell_size).floor() as i32;
        let gy0 = (rect.min_y / self.cell_size).floor() as i32;
        let gx1 = (rect.max_x / self.cell_size).ceil() as i32;
        let gy1 = (rect.max_y / self.cell_size).ceil() as i32;

        for gy in clamped_range(gy0, gy1, self.height) {
            for gx in clamped_range(gx0, gx1, self.width) {
                let idx = (gy * self.width + gx) as usize;
                self.walkable[idx] = value;
            }
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Clearance margin the obstacles were padded with at build time
    pub fn clearance(&self) -> f64 {
        self.clearance
    }

    pub fn in_bounds(&self, cell: GridCell) -> bool {
        cell.gx >= 0 && cell.gx < self.width && cell.gy >= 0 && cell.gy < self.height
    }

    /// Walkable test; out-of-bounds cells count as blocked
    pub fn is_walkable(&self, cell: GridCell) -> bool {
        self.in_bounds(cell) && self.walkable[(cell.gy * self.width + cell.gx) as usize]
    }

    /// Grid cell containing a floor-plan point
    pub fn cell_of(&self, point: Point2D) -> GridCell {
        GridCell::new(
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// Floor-plan center of a grid cell
    pub fn center_of(&self, cell: GridCell) -> Point2D {
        Point2D::new(
            (cell.gx as f64 + 0.5) * self.cell_size,
            (cell.gy as f64 + 0.5) * self.cell_size,
        )
    }

    /// Closest walkable cell to `cell` by breadth-first search
    ///
    /// Callers can use this to snap a stop that fell inside a shelf back
    /// into the nearest aisle before planning. The pathfinder itself never
    /// nudges; it reports `PointNotWalkable` instead.
    pub fn nearest_walkable(&self, cell: GridCell) -> Option<GridCell> {
        // Out-of-bounds requests search from the closest border cell
        let cell = GridCell::new(
            cell.gx.max(0).min(self.width - 1),
            cell.gy.max(0).min(self.height - 1),
        );
        if self.is_walkable(cell) {
            return Some(cell);
        }

        let mut queue = VecDeque::new();
        let mut seen = HashSet::new();
        queue.push_back(cell);
        seen.insert(cell);

        while let Some(current) = queue.pop_front() {
            for &(dx, dy) in &NEIGHBORS_8 {
                let next = GridCell::new(current.gx + dx, current.gy + dy);
                if !self.in_bounds(next) || seen.contains(&next) {
                    continue;
                }
                if self.is_walkable(next) {
                    return Some(next);
                }
                seen.insert(next);
                queue.push_back(next);
            }
        }
        None
    }
}

/// Fixed neighbor order keeps searches deterministic
pub(crate) const NEIGHBORS_8: [(i32, i32); 8] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
    (1, -1),
];

fn clamped_range(lo: i32, hi: i32, limit: i32) -> std::ops::Range<i32> {
    lo.max(0)..hi.min(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid(obstacles: &[Obstacle]) -> OccupancyGrid {
        // 200x100 floor, 20px cells -> 10x5 grid, 5px clearance
        GridBuilder::new(200.0, 100.0, 20.0, 5.0).build(obstacles).unwrap()
    }

    #[test]
    fn test_empty_floor_all_walkable() {
        let grid = small_grid(&[]);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 5);
        for gy in 0..grid.height() {
            for gx in 0..grid.width() {
                assert!(grid.is_walkable(GridCell::new(gx, gy)));
            }
        }
    }

    #[test]
    fn test_obstacle_blocks_padded_cells() {
        let grid = small_grid(&[Obstacle::new(1, 60.0, 20.0, 40.0, 40.0, "shelf")]);
        // Obstacle covers x 60..100, padded 55..105 -> cells 2..6
        // and y 20..60, padded 15..65 -> cells 0..4
        for gy in 0..4 {
            for gx in 2..6 {
                assert!(!grid.is_walkable(GridCell::new(gx, gy)), "cell ({}, {})", gx, gy);
            }
        }
        assert!(grid.is_walkable(GridCell::new(1, 1)));
        assert!(grid.is_walkable(GridCell::new(6, 1)));
        assert!(grid.is_walkable(GridCell::new(3, 4)));
    }

    #[test]
    fn test_obstacle_outside_bounds_ignored() {
        let grid = small_grid(&[Obstacle::new(1, 500.0, 500.0, 40.0, 40.0, "wall")]);
        for gy in 0..grid.height() {
            for gx in 0..grid.width() {
                assert!(grid.is_walkable(GridCell::new(gx, gy)));
            }
        }
    }

    #[test]
    fn test_overlapping_obstacles_union() {
        let a = Obstacle::new(1, 20.0, 20.0, 40.0, 20.0, "shelf");
        let b = Obstacle::new(2, 40.0, 20.0, 40.0, 20.0, "shelf");
        let ab = small_grid(&[a.clone(), b.clone()]);
        let ba = small_grid(&[b, a]);
        for gy in 0..ab.height() {
            for gx in 0..ab.width() {
                let cell = GridCell::new(gx, gy);
                assert_eq!(ab.is_walkable(cell), ba.is_walkable(cell));
            }
        }
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        let builder = GridBuilder::new(200.0, 100.0, 0.0, 5.0);
        assert!(matches!(
            builder.build(&[]),
            Err(RoutingError::DegenerateInput(_))
        ));

        let builder = GridBuilder::new(200.0, 100.0, 20.0, 5.0);
        let flat = Obstacle::new(1, 10.0, 10.0, 30.0, 0.0, "wall");
        assert!(matches!(
            builder.build(&[flat]),
            Err(RoutingError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_walkable_whitelist() {
        let grid = GridBuilder::new(200.0, 100.0, 20.0, 0.0)
            .with_walkable_areas(&[Rect::new(0.0, 0.0, 100.0, 100.0)])
            .build(&[])
            .unwrap();
        assert!(grid.is_walkable(GridCell::new(2, 2)));
        assert!(!grid.is_walkable(GridCell::new(8, 2)));
    }

    #[test]
    fn test_cell_point_conversions() {
        let grid = small_grid(&[]);
        let cell = grid.cell_of(Point2D::new(45.0, 75.0));
        assert_eq!(cell, GridCell::new(2, 3));
        let center = grid.center_of(cell);
        assert_eq!(center, Point2D::new(50.0, 70.0));
    }

    #[test]
    fn test_nearest_walkable_snaps_out_of_shelf() {
        let grid = small_grid(&[Obstacle::new(1, 60.0, 20.0, 40.0, 40.0, "shelf")]);
        let blocked = GridCell::new(3, 1);
        assert!(!grid.is_walkable(blocked));
        let snapped = grid.nearest_walkable(blocked).unwrap();
        assert!(grid.is_walkable(snapped));
    }

    #[test]
    fn test_random_worlds_never_leave_padded_cells_walkable() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let clearance = 4.0;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let obstacles: Vec<Obstacle> = (0..rng.gen_range(1..8))
                .map(|i| {
                    Obstacle::new(
                        i,
                        rng.gen_range(0.0..180.0),
                        rng.gen_range(0.0..80.0),
                        rng.gen_range(5.0..60.0),
                        rng.gen_range(5.0..40.0),
                        "shelf",
                    )
                })
                .collect();
            let grid = GridBuilder::new(200.0, 100.0, 10.0, clearance)
                .build(&obstacles)
                .unwrap();

            for gy in 0..grid.height() {
                for gx in 0..grid.width() {
                    let cell = GridCell::new(gx, gy);
                    if !grid.is_walkable(cell) {
                        continue;
                    }
                    let cs = grid.cell_size();
                    for obstacle in &obstacles {
                        let rect = Rect::from_obstacle_padded(obstacle, clearance);
                        let overlaps = (gx as f64) * cs < rect.max_x
                            && ((gx + 1) as f64) * cs > rect.min_x
                            && (gy as f64) * cs < rect.max_y
                            && ((gy + 1) as f64) * cs > rect.min_y;
                        assert!(
                            !overlaps,
                            "walkable cell ({}, {}) overlaps padded obstacle {}",
                            gx, gy, obstacle.id
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_nearest_walkable_fully_blocked() {
        let grid = GridBuilder::new(40.0, 40.0, 20.0, 0.0)
            .build(&[Obstacle::new(1, 0.0, 0.0, 40.0, 40.0, "wall")])
            .unwrap();
        assert_eq!(grid.nearest_walkable(GridCell::new(0, 0)), None);
    }
}
