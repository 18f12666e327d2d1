#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Run engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. The grid model lives in [`grid`] and is
//! shared by every layer.

pub mod grid;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{Grid, Walls};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Run.";

/// Smallest side length a level grid may have.
pub const MIN_GRID_SIZE: u32 = 5;

/// Largest side length a level grid may have.
pub const MAX_GRID_SIZE: u32 = 19;

/// Growth applied to the grid side every two levels.
pub const GRID_SIZE_STEP: u32 = 2;

/// First level that spawns a pursuing obstacle.
pub const DEFAULT_OBSTACLE_LEVEL: u32 = 10;

/// Minimum time between two move attempts accepted by the world.
pub const DEFAULT_MOVE_DEBOUNCE: Duration = Duration::from_millis(60);

/// Levels that always show the hint path regardless of the player's toggle.
pub const AUTO_HINT_MAX_LEVEL: u32 = 2;

/// Maps a level index onto the side length of its square grid.
///
/// The side grows by [`GRID_SIZE_STEP`] every two levels and is clamped to
/// `MIN_GRID_SIZE..=MAX_GRID_SIZE`. Level zero is treated as level one.
#[must_use]
pub fn level_to_size(level: u32) -> u32 {
    let step = level.max(1).saturating_sub(1) / 2;
    let size = MIN_GRID_SIZE.saturating_add(step.saturating_mul(GRID_SIZE_STEP));
    size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE)
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    column: u32,
    row: u32,
}

impl Cell {
    /// Top-left cell where every level starts.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Flat row-major index for a grid of the provided width.
    #[must_use]
    pub fn index(self, columns: u32) -> Option<usize> {
        let column = usize::try_from(self.column).ok()?;
        let row = usize::try_from(self.row).ok()?;
        let width = usize::try_from(columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Rebuilds a cell from its flat row-major index.
    #[must_use]
    pub fn from_index(index: usize, columns: u32) -> Option<Self> {
        let width = usize::try_from(columns).ok().filter(|width| *width > 0)?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(Self::new(column, row))
    }

    /// Adjacent cell in the provided direction without any bounds knowledge.
    ///
    /// Returns `None` only when the step would underflow or overflow the
    /// coordinate range.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in the canonical north, east, south, west order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Direction that leads from one cell to an orthogonally adjacent cell.
    #[must_use]
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| from.step(*direction) == Some(to))
    }
}

/// Discrete difficulty preset that selects the starting level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DifficultyTier {
    /// Tier 1, starts at level 1.
    #[default]
    Gentle,
    /// Tier 2, starts at level 3.
    Easy,
    /// Tier 3, starts at level 6.
    Medium,
    /// Tier 4, starts at level 10.
    Hard,
    /// Tier 5, starts at level 14.
    Expert,
}

impl DifficultyTier {
    /// Level a fresh run begins on for this tier.
    #[must_use]
    pub const fn starting_level(self) -> u32 {
        match self {
            Self::Gentle => 1,
            Self::Easy => 3,
            Self::Medium => 6,
            Self::Hard => 10,
            Self::Expert => 14,
        }
    }

    /// Numeric tier in the range `1..=5`.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Gentle => 1,
            Self::Easy => 2,
            Self::Medium => 3,
            Self::Hard => 4,
            Self::Expert => 5,
        }
    }
}

/// Raised when a numeric difficulty tier falls outside `1..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("difficulty tier {0} is outside the supported range 1..=5")]
pub struct TierOutOfRange(pub u8);

impl TryFrom<u8> for DifficultyTier {
    type Error = TierOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Gentle),
            2 => Ok(Self::Easy),
            3 => Ok(Self::Medium),
            4 => Ok(Self::Hard),
            5 => Ok(Self::Expert),
            other => Err(TierOutOfRange(other)),
        }
    }
}

impl From<DifficultyTier> for u8 {
    fn from(tier: DifficultyTier) -> Self {
        tier.number()
    }
}

/// Lifecycle phase of the current level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No maze is loaded yet; the next level is being prepared.
    Generating,
    /// The player may move through the maze.
    Playing,
    /// The player reached the goal.
    Won,
    /// The player and the obstacle met.
    Lost,
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveRejection {
    /// The request arrived inside the debounce window of the previous attempt.
    Debounced,
    /// A wall or the grid boundary blocks the requested direction.
    Blocked,
    /// The level is not accepting moves.
    NotPlaying,
}

/// Placement data for an obstacle spawned alongside a new level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleSpawn {
    /// Cell the obstacle starts on.
    pub cell: Cell,
    /// Base cooldown between obstacle moves.
    pub pacing: Duration,
    /// Earliest timestamp at which the obstacle may take its first step.
    pub next_move_at: Duration,
}

/// Immutable representation of the obstacle used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleSnapshot {
    /// Cell currently occupied by the obstacle.
    pub cell: Cell,
    /// Cell the obstacle occupied before its most recent step.
    pub previous: Option<Cell>,
    /// Earliest timestamp at which the obstacle may step again.
    pub next_move_at: Duration,
    /// Base cooldown between obstacle moves.
    pub pacing: Duration,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the current level with a freshly generated maze.
    BeginLevel {
        /// One-based level index.
        level: u32,
        /// Maze the level is played on.
        grid: Grid,
        /// Obstacle to place, if the level has one.
        obstacle: Option<ObstacleSpawn>,
    },
    /// Requests that the player advance a single cell.
    RequestMove {
        /// Direction of travel for the attempted step.
        direction: Direction,
        /// Timestamp of the request used for debouncing.
        at: Duration,
    },
    /// Advances the level clock.
    Tick {
        /// Current timestamp measured from the start of the session.
        now: Duration,
    },
    /// Moves the obstacle onto an adjacent open cell.
    MoveObstacle {
        /// Destination cell of the step.
        to: Cell,
        /// Earliest timestamp of the following step.
        next_move_at: Duration,
    },
    /// Keeps the obstacle in place and postpones its next step.
    RearmObstacle {
        /// Earliest timestamp of the following step.
        next_move_at: Duration,
    },
    /// Records the player's explicit hint preference.
    SetHint {
        /// Whether the hint path should be shown.
        enabled: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that a new maze is ready to play.
    LevelStarted {
        /// One-based level index.
        level: u32,
        /// Number of columns in the new grid.
        columns: u32,
        /// Number of rows in the new grid.
        rows: u32,
        /// Cell the obstacle spawned on, if any.
        obstacle: Option<Cell>,
    },
    /// Indicates that the level clock advanced.
    TimeAdvanced {
        /// Timestamp the clock advanced to.
        now: Duration,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: Cell,
        /// Cell the player occupies after moving.
        to: Cell,
    },
    /// Reports that a move request was discarded.
    MoveRejected {
        /// Direction of the discarded request.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Confirms that the obstacle moved between two cells.
    ObstacleMoved {
        /// Cell the obstacle occupied before moving.
        from: Cell,
        /// Cell the obstacle occupies after moving.
        to: Cell,
    },
    /// Announces that the player's hint preference changed.
    HintToggled {
        /// Whether the hint path is now shown.
        enabled: bool,
    },
    /// Announces that the player reached the goal.
    LevelWon {
        /// Level that was completed.
        level: u32,
    },
    /// Announces that the player and the obstacle collided.
    LevelLost {
        /// Level that was failed.
        level: u32,
        /// Cell where the collision happened.
        cell: Cell,
    },
}

/// Read-only view of everything a presentation layer needs to draw a frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderableState<'a> {
    /// One-based level index.
    pub level: u32,
    /// Lifecycle phase of the level.
    pub phase: Phase,
    /// Maze the level is played on.
    pub grid: &'a Grid,
    /// Cell occupied by the player.
    pub player: Cell,
    /// Cell the player must reach.
    pub goal: Cell,
    /// Cell occupied by the obstacle, if present.
    pub obstacle: Option<Cell>,
    /// Whether the hint path should be drawn.
    pub hint_enabled: bool,
}
