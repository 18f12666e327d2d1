#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized depth-first backtracker that carves perfect mazes.
//!
//! Carving starts from a fully walled grid at the origin cell and keeps an
//! explicit stack of the cells on the current corridor:
//!
//! 1. Peek the top of the stack.
//! 2. Collect its in-bounds unvisited neighbours (north, east, south, west).
//! 3. With none left, pop and backtrack.
//! 4. Otherwise pick one uniformly, remove the shared wall, mark it visited
//!    and push it.
//!
//! Every cell is visited exactly once, so the open edges form a spanning tree
//! and exactly one simple path joins any two cells.

use maze_run_core::{Cell, Direction, Grid};
use rand::Rng;

/// Carves a perfect maze of the requested dimensions.
///
/// A zero dimension produces an empty grid.
#[must_use]
pub fn generate<R>(columns: u32, rows: u32, rng: &mut R) -> Grid
where
    R: Rng + ?Sized,
{
    let mut carver = Carver::new(columns, rows);
    while carver.step(rng) != CarveStep::Finished {}
    carver.into_grid()
}

/// Outcome of a single carving iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarveStep {
    /// A wall was removed and the neighbour pushed onto the stack.
    Carved {
        /// Cell on top of the stack before the step.
        from: Cell,
        /// Newly visited neighbour.
        to: Cell,
    },
    /// The top cell had no unvisited neighbours and was popped.
    Backtracked {
        /// Cell that was popped.
        cell: Cell,
    },
    /// The stack is empty and every cell has been visited.
    Finished,
}

/// Incremental carving state exposing the backtracking stack.
#[derive(Clone, Debug)]
pub struct Carver {
    grid: Grid,
    visited: Vec<bool>,
    stack: Vec<Cell>,
}

impl Carver {
    /// Prepares a fully walled grid with the origin already visited.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let grid = Grid::fully_walled(columns, rows);
        let mut visited = vec![false; grid.cell_count()];
        let mut stack = Vec::with_capacity(grid.cell_count());

        if let Some(origin) = grid.index_of(Cell::ORIGIN) {
            visited[origin] = true;
            stack.push(Cell::ORIGIN);
        }

        Self {
            grid,
            visited,
            stack,
        }
    }

    /// Performs one iteration of the backtracker.
    pub fn step<R>(&mut self, rng: &mut R) -> CarveStep
    where
        R: Rng + ?Sized,
    {
        let Some(&current) = self.stack.last() else {
            return CarveStep::Finished;
        };

        let mut options = [(Direction::North, Cell::ORIGIN); 4];
        let mut count = 0;
        for direction in Direction::ALL {
            let Some(neighbor) = self.grid.neighbor(current, direction) else {
                continue;
            };
            if !self.is_visited(neighbor) {
                options[count] = (direction, neighbor);
                count += 1;
            }
        }

        if count == 0 {
            let _ = self.stack.pop();
            return CarveStep::Backtracked { cell: current };
        }

        let (direction, next) = options[rng.gen_range(0..count)];
        let carved = self.grid.carve(current, direction);
        debug_assert!(carved, "neighbour {next:?} must be inside the grid");

        if let Some(index) = self.grid.index_of(next) {
            self.visited[index] = true;
        }
        self.stack.push(next);

        CarveStep::Carved {
            from: current,
            to: next,
        }
    }

    /// Cells currently on the backtracking stack, bottom first.
    #[must_use]
    pub fn stack(&self) -> &[Cell] {
        &self.stack
    }

    /// Grid in its current, possibly partially carved, state.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Reports whether the carver has already visited the cell.
    #[must_use]
    pub fn is_visited(&self, cell: Cell) -> bool {
        self.grid
            .index_of(cell)
            .and_then(|index| self.visited.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether carving has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// Consumes the carver, yielding the carved grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}
