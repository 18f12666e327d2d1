//! Breadth-first path solver over the open edges of a maze grid.

use std::collections::VecDeque;

use maze_run_core::{Cell, Grid};

/// Shortest sequence of cells leading from `start` to `goal`, both inclusive.
///
/// The search only follows open edges. Returns an empty vector when either
/// endpoint lies outside the grid or the goal cannot be reached. On a perfect
/// maze the result is the unique simple path between the two cells.
#[must_use]
pub fn shortest_path(grid: &Grid, start: Cell, goal: Cell) -> Vec<Cell> {
    let (Some(start_index), Some(goal_index)) = (grid.index_of(start), grid.index_of(goal)) else {
        return Vec::new();
    };

    let cell_count = grid.cell_count();
    let mut visited = vec![false; cell_count];
    let mut predecessors: Vec<Option<usize>> = vec![None; cell_count];
    let mut queue = VecDeque::with_capacity(cell_count);

    visited[start_index] = true;
    queue.push_back(start_index);

    let mut reached = false;
    while let Some(current) = queue.pop_front() {
        if current == goal_index {
            reached = true;
            break;
        }

        let Some(cell) = grid.cell_at(current) else {
            continue;
        };

        for neighbor in grid.open_neighbors(cell) {
            let Some(neighbor_index) = grid.index_of(neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }

            visited[neighbor_index] = true;
            predecessors[neighbor_index] = Some(current);
            queue.push_back(neighbor_index);
        }
    }

    if !reached {
        return Vec::new();
    }

    let mut path = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        if let Some(cell) = grid.cell_at(index) {
            path.push(cell);
        }
        cursor = predecessors[index];
    }
    path.reverse();
    path
}

/// Number of steps along the shortest path, if the goal is reachable.
#[must_use]
pub fn distance(grid: &Grid, start: Cell, goal: Cell) -> Option<usize> {
    let path = shortest_path(grid, start, goal);
    path.len().checked_sub(1)
}
