#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Run adapters.

use std::time::Duration;

use anyhow::Result as AnyResult;
use maze_run_core::{Cell, Direction, Grid, Phase, RenderableState};

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction the player asked to move in on this frame.
    pub movement: Option<Direction>,
    /// Whether the adapter detected a hint toggle press on this frame.
    pub toggle_hint: bool,
    /// Whether the adapter detected a request to regenerate the current level.
    pub restart: bool,
    /// Whether the player asked to leave the game.
    pub quit: bool,
}

impl FrameInput {
    /// Input requesting a single move.
    #[must_use]
    pub const fn movement(direction: Direction) -> Self {
        Self {
            movement: Some(direction),
            toggle_hint: false,
            restart: false,
            quit: false,
        }
    }

    /// Reports whether the frame carries no player intent.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.movement.is_none() && !self.toggle_hint && !self.restart && !self.quit
    }
}

/// Symbol drawn inside a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Nothing occupies the cell.
    Empty,
    /// Cell lies on the hint path.
    Hint,
    /// Cell is the level goal.
    Goal,
    /// Cell holds the obstacle.
    Obstacle,
    /// Cell holds the player.
    Player,
}

impl Glyph {
    /// Character used by text backends.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Hint => '.',
            Self::Goal => '*',
            Self::Obstacle => 'X',
            Self::Player => '@',
        }
    }
}

/// Owned snapshot of a frame handed to rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// One-based level index.
    pub level: u32,
    /// Lifecycle phase of the level.
    pub phase: Phase,
    /// Maze walls.
    pub grid: Grid,
    /// Cell occupied by the player.
    pub player: Cell,
    /// Cell the player must reach.
    pub goal: Cell,
    /// Cell occupied by the obstacle, if any.
    pub obstacle: Option<Cell>,
    /// Whether the hint is switched on.
    pub hint_enabled: bool,
    /// Cells of the hint path, empty while the hint is off.
    pub hint: Vec<Cell>,
    /// Set when the last move attempt ran into a wall.
    pub bumped: bool,
    /// Short message describing the last level transition.
    pub notice: Option<String>,
}

impl Scene {
    /// Captures the provided world state together with its hint path.
    #[must_use]
    pub fn new(state: &RenderableState<'_>, hint: Vec<Cell>) -> Self {
        Self {
            level: state.level,
            phase: state.phase,
            grid: state.grid.clone(),
            player: state.player,
            goal: state.goal,
            obstacle: state.obstacle,
            hint_enabled: state.hint_enabled,
            hint,
            bumped: false,
            notice: None,
        }
    }

    /// Replaces the world snapshot, keeping the bump flag and notice.
    pub fn refresh(&mut self, state: &RenderableState<'_>, hint: Vec<Cell>) {
        let bumped = self.bumped;
        let notice = self.notice.take();
        *self = Self::new(state, hint);
        self.bumped = bumped;
        self.notice = notice;
    }

    /// Symbol to draw for the cell, highest priority occupant first.
    #[must_use]
    pub fn glyph(&self, cell: Cell) -> Glyph {
        if cell == self.player {
            Glyph::Player
        } else if self.obstacle == Some(cell) {
            Glyph::Obstacle
        } else if cell == self.goal {
            Glyph::Goal
        } else if self.hint.contains(&cell) {
            Glyph::Hint
        } else {
            Glyph::Empty
        }
    }

    /// One-line summary printed above the maze.
    #[must_use]
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "Level {}  {}x{}  hint {}",
            self.level,
            self.grid.columns(),
            self.grid.rows(),
            if self.hint_enabled { "on" } else { "off" },
        );
        if self.obstacle.is_some() {
            line.push_str("  obstacle!");
        }
        if self.bumped {
            line.push_str("  *bump*");
        }
        line
    }
}

/// Draws the maze as text, one `+---+` post row and one cell row per maze row.
#[must_use]
pub fn render_ascii(scene: &Scene) -> String {
    let grid = &scene.grid;
    let mut out = String::new();

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let cell = Cell::new(column, row);
            out.push('+');
            out.push_str(if grid.is_open(cell, Direction::North) {
                "   "
            } else {
                "---"
            });
        }
        out.push_str("+\n");

        for column in 0..grid.columns() {
            let cell = Cell::new(column, row);
            out.push(if grid.is_open(cell, Direction::West) {
                ' '
            } else {
                '|'
            });
            out.push(' ');
            out.push(scene.glyph(cell).symbol());
            out.push(' ');
        }
        out.push_str("|\n");
    }

    for _ in 0..grid.columns() {
        out.push_str("+---");
    }
    out.push_str("+\n");
    out
}

/// Rendering backend capable of presenting Maze Run scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and per-frame input captured by the adapter, and refreshes the scene
    /// before it is presented.
    fn run<F>(self, scene: Scene, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}
