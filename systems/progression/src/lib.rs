#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level progression and the session facade handed to presentation layers.
//!
//! A [`Session`] owns the authoritative world, the pursuit system and the
//! random source. It generates mazes on demand, forwards player input and
//! frame ticks to the world, and reacts to `LevelWon`/`LevelLost` by
//! generating the next or the same level. Every call returns the events the
//! world broadcast while handling it.

use std::time::Duration;

use log::info;
use maze_run_core::{
    level_to_size, Cell, Command, Direction, Event, Phase, RenderableState, DEFAULT_MOVE_DEBOUNCE,
};
use maze_run_system_generation::generate;
use maze_run_system_pursuit::{Pursuit, PursuitTuning};
use maze_run_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Minimum time between two move attempts.
    pub move_debounce: Duration,
    /// Obstacle placement, pacing and scoring parameters.
    pub pursuit: PursuitTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            move_debounce: DEFAULT_MOVE_DEBOUNCE,
            pursuit: PursuitTuning::default(),
        }
    }
}

/// Single-threaded game session driving one world through its levels.
#[derive(Debug)]
pub struct Session<R = ChaCha8Rng> {
    world: World,
    pursuit: Pursuit,
    rng: R,
    now: Duration,
}

impl Session<ChaCha8Rng> {
    /// Creates a session seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy(config: Config) -> Self {
        Self::new(config, ChaCha8Rng::from_entropy())
    }

    /// Creates a session whose mazes and obstacle walks are reproducible.
    #[must_use]
    pub fn seeded(config: Config, seed: u64) -> Self {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    /// Creates a session using the provided random source.
    ///
    /// No level is loaded until [`Session::new_level`] is called.
    #[must_use]
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            world: World::with_move_debounce(config.move_debounce),
            pursuit: Pursuit::new(config.pursuit),
            rng,
            now: Duration::ZERO,
        }
    }

    /// Generates a fresh maze for the provided level and starts playing it.
    pub fn new_level(&mut self, level: u32) -> Vec<Event> {
        let mut events = Vec::new();
        self.begin_level(level, &mut events);
        events
    }

    /// Regenerates the current level without changing its index.
    pub fn restart(&mut self) -> Vec<Event> {
        self.new_level(query::level(&self.world))
    }

    /// Requests that the player advance one cell.
    pub fn request_move(&mut self, direction: Direction, now: Duration) -> Vec<Event> {
        self.now = now;
        let mut events = Vec::new();
        self.execute(Command::RequestMove { direction, at: now }, &mut events);
        events
    }

    /// Advances the clock and lets the obstacle take at most one step.
    pub fn tick(&mut self, now: Duration) -> Vec<Event> {
        self.now = now;
        let mut events = Vec::new();
        self.execute(Command::Tick { now }, &mut events);

        if query::phase(&self.world) != Phase::Playing {
            return events;
        }

        let Some(obstacle) = query::obstacle(&self.world) else {
            return events;
        };

        let proposal = self.pursuit.advance(
            &obstacle,
            query::grid(&self.world),
            query::player(&self.world),
            query::goal(&self.world),
            now,
            &mut self.rng,
        );
        if let Some(command) = proposal {
            self.execute(command, &mut events);
        }

        events
    }

    /// Records an explicit hint preference.
    pub fn set_hint(&mut self, enabled: bool) -> Vec<Event> {
        let mut events = Vec::new();
        self.execute(Command::SetHint { enabled }, &mut events);
        events
    }

    /// Flips the hint preference.
    pub fn toggle_hint(&mut self) -> Vec<Event> {
        let enabled = !query::hint_enabled(&self.world);
        self.set_hint(enabled)
    }

    /// Shortest path from the player to the goal, empty while the hint is off.
    #[must_use]
    pub fn hint_path(&self) -> Vec<Cell> {
        query::hint_path(&self.world)
    }

    /// Everything a presentation layer needs to draw the current frame.
    #[must_use]
    pub fn renderable_state(&self) -> RenderableState<'_> {
        query::renderable_state(&self.world)
    }

    /// Current one-based level index.
    #[must_use]
    pub fn level(&self) -> u32 {
        query::level(&self.world)
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn begin_level(&mut self, level: u32, out_events: &mut Vec<Event>) {
        let level = level.max(1);
        let size = level_to_size(level);
        let grid = generate(size, size, &mut self.rng);
        let obstacle = self.pursuit.spawn(level, &grid, self.now, &mut self.rng);
        world::apply(
            &mut self.world,
            Command::BeginLevel {
                level,
                grid,
                obstacle,
            },
            out_events,
        );
    }

    fn execute(&mut self, command: Command, out_events: &mut Vec<Event>) {
        let first = out_events.len();
        world::apply(&mut self.world, command, out_events);

        let next_level = out_events[first..].iter().find_map(|event| match event {
            Event::LevelWon { level } => {
                info!("level {level} completed");
                Some(level.saturating_add(1))
            }
            Event::LevelLost { level, .. } => {
                info!("level {level} failed; regenerating");
                Some(*level)
            }
            _ => None,
        });

        if let Some(level) = next_level {
            self.begin_level(level, out_events);
        }
    }
}
