//! Wall-based grid model shared by the generator, solver and pursuit policy.


use crate::{Cell, Direction};

/// Barrier flags recorded on each side of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Walls {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl Walls {
    /// Walls present on every side.
    pub const CLOSED: Self = Self {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    /// Reports whether a barrier exists on the provided side.
    #[must_use]
    pub const fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Barrier on the northern side.
    #[must_use]
    pub const fn north(&self) -> bool {
        self.north
    }

    /// Barrier on the eastern side.
    #[must_use]
    pub const fn east(&self) -> bool {
        self.east
    }

    /// Barrier on the southern side.
    #[must_use]
    pub const fn south(&self) -> bool {
        self.south
    }

    /// Barrier on the western side.
    #[must_use]
    pub const fn west(&self) -> bool {
        self.west
    }

    fn clear(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north = false,
            Direction::East => self.east = false,
            Direction::South => self.south = false,
            Direction::West => self.west = false,
        }
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// Rectangular maze grid storing the wall state of every cell in row-major order.
///
/// The dimensions never change after construction. The only mutation is
/// [`Grid::carve`], which clears the shared wall on both sides so the
/// structure stays symmetric.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    walls: Vec<Walls>,
}

impl Grid {
    /// Creates a grid where every cell is enclosed by four walls.
    #[must_use]
    pub fn fully_walled(columns: u32, rows: u32) -> Self {
        let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        if count == 0 {
            return Self::default();
        }

        Self {
            columns,
            rows,
            walls: vec![Walls::CLOSED; count],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Flat row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        cell.index(self.columns)
            .filter(|index| *index < self.walls.len())
    }

    /// Cell stored at the provided flat index, if any.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        if index >= self.walls.len() {
            return None;
        }
        Cell::from_index(index, self.columns)
    }

    /// Wall state of the provided cell.
    #[must_use]
    pub fn walls(&self, cell: Cell) -> Option<Walls> {
        self.index_of(cell)
            .and_then(|index| self.walls.get(index).copied())
    }

    /// Adjacent in-bounds cell in the provided direction, ignoring walls.
    #[must_use]
    pub fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        if !self.contains(cell) {
            return None;
        }
        cell.step(direction)
            .filter(|neighbor| self.contains(*neighbor))
    }

    /// Reports whether an open edge leads out of the cell in the provided direction.
    #[must_use]
    pub fn is_open(&self, cell: Cell, direction: Direction) -> bool {
        self.neighbor(cell, direction).is_some()
            && self
                .walls(cell)
                .map_or(false, |walls| !walls.has(direction))
    }

    /// Cells reachable from the provided cell through a single open edge.
    ///
    /// Neighbours are yielded in north, east, south, west order.
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.is_open(cell, *direction))
            .filter_map(move |direction| cell.step(direction))
    }

    /// Removes the wall between the cell and its neighbour in the provided direction.
    ///
    /// Both sides of the shared wall are cleared. Returns `false` without
    /// mutating anything when the neighbour would fall outside the grid.
    pub fn carve(&mut self, cell: Cell, direction: Direction) -> bool {
        let Some(neighbor) = self.neighbor(cell, direction) else {
            return false;
        };
        let (Some(from), Some(to)) = (self.index_of(cell), self.index_of(neighbor)) else {
            return false;
        };

        self.walls[from].clear(direction);
        self.walls[to].clear(direction.opposite());
        true
    }

    /// Number of open edges between adjacent cells.
    ///
    /// Each edge is counted once by only looking east and south.
    #[must_use]
    pub fn open_edge_count(&self) -> usize {
        self.cells()
            .map(|cell| {
                usize::from(self.is_open(cell, Direction::East))
                    + usize::from(self.is_open(cell, Direction::South))
            })
            .sum()
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.walls.len()).filter_map(move |index| Cell::from_index(index, self.columns))
    }
}
