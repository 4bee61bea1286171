//! A* shortest-path search over the occupancy grid
//!
//! Standard A* with 8-directional movement, Euclidean heuristic and unit /
//! sqrt(2) step costs. Diagonal steps are rejected when either orthogonal
//! neighbor cell is blocked, so paths never cut through the corner between
//! two obstacles. Output is deterministic: the open set orders by total
//! cost and breaks ties by insertion order.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use ordered_float::NotNan;

use crate::common::error::{RoutingError, RoutingResult};
use crate::common::types::GridCell;
use crate::grid::occupancy::OccupancyGrid;

/// Search node stored in the backtracking arena
#[derive(Debug, Clone)]
struct Node {
    cell: GridCell,
    cost: f64,
    parent_index: Option<usize>,
}

/// Open-set entry; min-heap by priority, then by insertion sequence
#[derive(Debug)]
struct OpenNode {
    priority: NotNan<f64>,
    seq: u64,
    index: usize,
}

impl Eq for OpenNode {}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; earlier insertion wins ties
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// dx, dy, step cost
const MOTION: [(i32, i32, f64); 8] = [
    (1, 0, 1.0),
    (0, 1, 1.0),
    (-1, 0, 1.0),
    (0, -1, 1.0),
    (1, 1, std::f64::consts::SQRT_2),
    (-1, 1, std::f64::consts::SQRT_2),
    (-1, -1, std::f64::consts::SQRT_2),
    (1, -1, std::f64::consts::SQRT_2),
];

fn heuristic(a: GridCell, b: GridCell) -> f64 {
    (((a.gx - b.gx).pow(2) + (a.gy - b.gy).pow(2)) as f64).sqrt()
}

/// Find the shortest cell path from `start` to `goal`
///
/// Fails with `PointNotWalkable` when either endpoint is blocked or out of
/// bounds and with `NoPathFound` when the open set is exhausted; both are
/// recoverable and callers fall back to a straight segment.
pub fn find_grid_path(
    grid: &OccupancyGrid,
    start: GridCell,
    goal: GridCell,
) -> RoutingResult<Vec<GridCell>> {
    if !grid.is_walkable(start) {
        return Err(RoutingError::PointNotWalkable(start));
    }
    if !grid.is_walkable(goal) {
        return Err(RoutingError::PointNotWalkable(goal));
    }

    let flat = |cell: GridCell| cell.gy * grid.width() + cell.gx;

    let mut node_storage = vec![Node { cell: start, cost: 0.0, parent_index: None }];
    let mut open_set = BinaryHeap::new();
    let mut closed_set: HashSet<i32> = HashSet::new();
    let mut g_values: HashMap<i32, f64> = HashMap::new();
    let mut seq = 0u64;

    g_values.insert(flat(start), 0.0);
    open_set.push(OpenNode {
        priority: NotNan::new(heuristic(start, goal)).expect("heuristic is finite"),
        seq,
        index: 0,
    });

    while let Some(current) = open_set.pop() {
        let (cell, cost) = {
            let node = &node_storage[current.index];
            (node.cell, node.cost)
        };
        let cell_key = flat(cell);

        if cell == goal {
            return Ok(backtrack(current.index, &node_storage));
        }

        // Skip stale entries already expanded with a better cost
        if !closed_set.insert(cell_key) {
            continue;
        }

        for &(dx, dy, step_cost) in &MOTION {
            let next = GridCell::new(cell.gx + dx, cell.gy + dy);
            if !grid.is_walkable(next) {
                continue;
            }
            // No corner cutting: a diagonal step must pass two open
            // orthogonal cells
            if dx != 0 && dy != 0 {
                let side_a = GridCell::new(cell.gx + dx, cell.gy);
                let side_b = GridCell::new(cell.gx, cell.gy + dy);
                if !grid.is_walkable(side_a) || !grid.is_walkable(side_b) {
                    continue;
                }
            }

            let next_key = flat(next);
            if closed_set.contains(&next_key) {
                continue;
            }

            let next_cost = cost + step_cost;
            let existing = g_values.get(&next_key).copied().unwrap_or(f64::INFINITY);
            if next_cost >= existing {
                continue;
            }
            g_values.insert(next_key, next_cost);

            node_storage.push(Node {
                cell: next,
                cost: next_cost,
                parent_index: Some(current.index),
            });
            seq += 1;
            open_set.push(OpenNode {
                priority: NotNan::new(next_cost + heuristic(next, goal))
                    .expect("path costs are finite"),
                seq,
                index: node_storage.len() - 1,
            });
        }
    }

    Err(RoutingError::NoPathFound)
}

fn backtrack(goal_index: usize, node_storage: &[Node]) -> Vec<GridCell> {
    let mut cells = Vec::new();
    let mut current_index = Some(goal_index);
    while let Some(index) = current_index {
        let node = &node_storage[index];
        cells.push(node.cell);
        current_index = node.parent_index;
    }
    cells.reverse();
    cells
}
