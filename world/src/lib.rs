#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Maze Run.
//!
//! The [`World`] is the single aggregate owning the maze, the player, the goal
//! and the obstacle. It is only mutated through [`apply`] and only read
//! through the [`query`] module.

pub mod navigation;

use std::time::Duration;

use log::{debug, warn};
use maze_run_core::{
    Cell, Command, Direction, Event, Grid, MoveRejection, ObstacleSpawn, Phase,
    AUTO_HINT_MAX_LEVEL, DEFAULT_MOVE_DEBOUNCE,
};

/// Represents the authoritative Maze Run level state.
#[derive(Debug)]
pub struct World {
    level: u32,
    phase: Phase,
    grid: Grid,
    player: Cell,
    goal: Cell,
    obstacle: Option<Obstacle>,
    hint_enabled: bool,
    hint_preference: Option<bool>,
    move_debounce: Duration,
    last_move_attempt: Option<Duration>,
    clock: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Obstacle {
    cell: Cell,
    previous: Option<Cell>,
    next_move_at: Duration,
    pacing: Duration,
}

impl World {
    /// Creates an empty world waiting for its first level.
    #[must_use]
    pub fn new() -> Self {
        Self::with_move_debounce(DEFAULT_MOVE_DEBOUNCE)
    }

    /// Creates an empty world using a custom debounce between move attempts.
    #[must_use]
    pub fn with_move_debounce(move_debounce: Duration) -> Self {
        Self {
            level: 1,
            phase: Phase::Generating,
            grid: Grid::default(),
            player: Cell::ORIGIN,
            goal: Cell::ORIGIN,
            obstacle: None,
            hint_enabled: false,
            hint_preference: None,
            move_debounce,
            last_move_attempt: None,
            clock: Duration::ZERO,
        }
    }

    fn begin_level(
        &mut self,
        level: u32,
        grid: Grid,
        obstacle: Option<ObstacleSpawn>,
        out_events: &mut Vec<Event>,
    ) {
        let level = level.max(1);
        self.level = level;
        self.obstacle = None;
        self.last_move_attempt = None;

        if grid.cell_count() == 0 {
            warn!("level {level} received an empty grid; waiting for another maze");
            self.grid = grid;
            self.phase = Phase::Generating;
            return;
        }

        self.goal = Cell::new(grid.columns() - 1, grid.rows() - 1);
        self.player = Cell::ORIGIN;
        self.obstacle = obstacle
            .filter(|spawn| {
                let valid =
                    grid.contains(spawn.cell) && spawn.cell != self.player && spawn.cell != self.goal;
                if !valid {
                    warn!("discarding obstacle spawn on {:?}", spawn.cell);
                }
                valid
            })
            .map(|spawn| Obstacle {
                cell: spawn.cell,
                previous: None,
                next_move_at: spawn.next_move_at,
                pacing: spawn.pacing,
            });
        self.grid = grid;
        self.hint_enabled =
            level <= AUTO_HINT_MAX_LEVEL || self.hint_preference.unwrap_or(false);
        self.phase = Phase::Playing;

        debug!(
            "level {level} started on a {}x{} grid with obstacle {:?}",
            self.grid.columns(),
            self.grid.rows(),
            self.obstacle.map(|obstacle| obstacle.cell)
        );
        out_events.push(Event::LevelStarted {
            level,
            columns: self.grid.columns(),
            rows: self.grid.rows(),
            obstacle: self.obstacle.map(|obstacle| obstacle.cell),
        });
    }

    fn request_move(&mut self, direction: Direction, at: Duration, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Playing {
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::NotPlaying,
            });
            return;
        }

        if let Some(last) = self.last_move_attempt {
            if at.saturating_sub(last) < self.move_debounce {
                out_events.push(Event::MoveRejected {
                    direction,
                    reason: MoveRejection::Debounced,
                });
                return;
            }
        }

        self.last_move_attempt = Some(at);

        let destination = self
            .grid
            .is_open(self.player, direction)
            .then(|| self.player.step(direction))
            .flatten();
        let Some(destination) = destination else {
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::Blocked,
            });
            return;
        };

        let from = self.player;
        self.player = destination;
        out_events.push(Event::PlayerMoved {
            from,
            to: destination,
        });

        if self.obstacle_at(destination) {
            self.lose(destination, out_events);
        } else if destination == self.goal {
            self.win(out_events);
        }
    }

    fn move_obstacle(&mut self, to: Cell, next_move_at: Duration, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Playing {
            return;
        }

        let Some(obstacle) = self.obstacle.as_mut() else {
            warn!("ignoring obstacle step toward {to:?}: no obstacle on this level");
            return;
        };

        let from = obstacle.cell;
        let connected = Direction::between(from, to)
            .map_or(false, |direction| self.grid.is_open(from, direction));
        if !connected || to == self.goal {
            warn!("ignoring invalid obstacle step from {from:?} to {to:?}");
            return;
        }

        obstacle.previous = Some(from);
        obstacle.cell = to;
        obstacle.next_move_at = next_move_at;
        out_events.push(Event::ObstacleMoved { from, to });

        if to == self.player {
            self.lose(to, out_events);
        }
    }

    fn obstacle_at(&self, cell: Cell) -> bool {
        self.obstacle.map_or(false, |obstacle| obstacle.cell == cell)
    }

    fn win(&mut self, out_events: &mut Vec<Event>) {
        self.phase = Phase::Won;
        debug!("level {} won", self.level);
        out_events.push(Event::LevelWon { level: self.level });
    }

    fn lose(&mut self, cell: Cell, out_events: &mut Vec<Event>) {
        self.phase = Phase::Lost;
        debug!("level {} lost at {cell:?}", self.level);
        out_events.push(Event::LevelLost {
            level: self.level,
            cell,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginLevel {
            level,
            grid,
            obstacle,
        } => world.begin_level(level, grid, obstacle, out_events),
        Command::RequestMove { direction, at } => world.request_move(direction, at, out_events),
        Command::Tick { now } => {
            world.clock = now;
            out_events.push(Event::TimeAdvanced { now });
        }
        Command::MoveObstacle { to, next_move_at } => {
            world.move_obstacle(to, next_move_at, out_events);
        }
        Command::RearmObstacle { next_move_at } => {
            if let Some(obstacle) = world.obstacle.as_mut() {
                obstacle.next_move_at = next_move_at;
            }
        }
        Command::SetHint { enabled } => {
            world.hint_preference = Some(enabled);
            world.hint_enabled = enabled;
            out_events.push(Event::HintToggled { enabled });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use log::warn;
    use maze_run_core::{Cell, Grid, ObstacleSnapshot, Phase, RenderableState};

    use super::{navigation, World};

    /// Current one-based level index.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Lifecycle phase of the current level.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Provides read-only access to the current maze.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> Cell {
        world.player
    }

    /// Cell the player must reach to win the level.
    #[must_use]
    pub fn goal(world: &World) -> Cell {
        world.goal
    }

    /// Latest timestamp the world clock advanced to.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Captures the obstacle state, if the level has one.
    #[must_use]
    pub fn obstacle(world: &World) -> Option<ObstacleSnapshot> {
        world.obstacle.map(|obstacle| ObstacleSnapshot {
            cell: obstacle.cell,
            previous: obstacle.previous,
            next_move_at: obstacle.next_move_at,
            pacing: obstacle.pacing,
        })
    }

    /// Whether the hint path is currently shown.
    #[must_use]
    pub fn hint_enabled(world: &World) -> bool {
        world.hint_enabled
    }

    /// Shortest path from the player to the goal while the hint is enabled.
    ///
    /// Returns an empty path when the hint is off or the level is not being
    /// played. An unreachable goal means the maze is not perfect; debug builds
    /// treat that as a fatal invariant violation, release builds hide the hint.
    #[must_use]
    pub fn hint_path(world: &World) -> Vec<Cell> {
        if !world.hint_enabled || world.phase != Phase::Playing {
            return Vec::new();
        }

        let path = navigation::shortest_path(&world.grid, world.player, world.goal);
        debug_assert!(
            !path.is_empty(),
            "goal {:?} unreachable from {:?}",
            world.goal,
            world.player
        );
        if path.is_empty() {
            warn!(
                "goal {:?} unreachable from {:?}; hiding hint",
                world.goal, world.player
            );
        }
        path
    }

    /// Captures everything a presentation layer needs to draw the level.
    #[must_use]
    pub fn renderable_state(world: &World) -> RenderableState<'_> {
        RenderableState {
            level: world.level,
            phase: world.phase,
            grid: &world.grid,
            player: world.player,
            goal: world.goal,
            obstacle: world.obstacle.map(|obstacle| obstacle.cell),
            hint_enabled: world.hint_enabled,
        }
    }
}
