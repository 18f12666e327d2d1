#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Obstacle placement and the biased-walk policy that moves it every tick.
//!
//! The policy is local: it only looks at the open neighbours of the obstacle
//! and scores them by straight-line distances. Candidates farther from the
//! player score higher, the goal region pulls mildly, and stepping straight
//! back is penalised, so the obstacle patrols and blocks rather than chases.

use std::time::Duration;

use log::debug;
use maze_run_core::{Cell, Command, Grid, ObstacleSnapshot, ObstacleSpawn, DEFAULT_OBSTACLE_LEVEL};
use rand::Rng;

/// Tuning knobs controlling obstacle placement, pacing and scoring.
#[derive(Clone, Debug, PartialEq)]
pub struct PursuitTuning {
    /// First level that spawns an obstacle.
    pub spawn_level: u32,
    /// Base cooldown between obstacle moves on the first obstacle level.
    pub pacing: Duration,
    /// Cooldown reduction applied for every level past `spawn_level`.
    pub pacing_step: Duration,
    /// Shortest cooldown the level scaling may reach.
    pub min_pacing: Duration,
    /// Half-width of the uniform jitter added to every cooldown.
    ///
    /// Capped at half the cooldown, so a jittered cooldown never drops below
    /// half its base value.
    pub jitter: Duration,
    /// Upper bound of the uniform random term added to every score.
    pub random_weight: f32,
    /// Weight of the Manhattan distance between a candidate and the player.
    pub player_weight: f32,
    /// Weight of the Manhattan distance between a candidate and the goal.
    pub goal_weight: f32,
    /// Penalty subtracted when a candidate is the previously occupied cell.
    pub backtrack_penalty: f32,
}

impl PursuitTuning {
    /// Base cooldown for the provided level.
    #[must_use]
    pub fn pacing_for_level(&self, level: u32) -> Duration {
        let levels_past = level.saturating_sub(self.spawn_level);
        let reduction = self
            .pacing_step
            .checked_mul(levels_past)
            .unwrap_or(Duration::MAX);
        self.pacing.saturating_sub(reduction).max(self.min_pacing)
    }
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            spawn_level: DEFAULT_OBSTACLE_LEVEL,
            pacing: Duration::from_millis(520),
            pacing_step: Duration::from_millis(15),
            min_pacing: Duration::from_millis(300),
            jitter: Duration::from_millis(90),
            random_weight: 0.9,
            player_weight: 0.28,
            goal_weight: 0.06,
            backtrack_penalty: 0.7,
        }
    }
}

/// Pure system that places the obstacle and proposes its steps.
#[derive(Clone, Debug, Default)]
pub struct Pursuit {
    tuning: PursuitTuning,
}

impl Pursuit {
    /// Creates a pursuit system using the supplied tuning.
    #[must_use]
    pub fn new(tuning: PursuitTuning) -> Self {
        Self { tuning }
    }

    /// Tuning the system was configured with.
    #[must_use]
    pub fn tuning(&self) -> &PursuitTuning {
        &self.tuning
    }

    /// Reports whether the level is high enough to host an obstacle.
    #[must_use]
    pub fn spawns_on(&self, level: u32) -> bool {
        level >= self.tuning.spawn_level
    }

    /// Places an obstacle for a freshly generated level, if the level has one.
    pub fn spawn<R>(
        &self,
        level: u32,
        grid: &Grid,
        now: Duration,
        rng: &mut R,
    ) -> Option<ObstacleSpawn>
    where
        R: Rng + ?Sized,
    {
        if !self.spawns_on(level) {
            return None;
        }

        let cell = self.spawn_cell(grid, rng)?;
        let pacing = self.tuning.pacing_for_level(level);
        let next_move_at = self.jittered(now, pacing, rng);
        debug!("obstacle spawns on {cell:?} with pacing {pacing:?}");

        Some(ObstacleSpawn {
            cell,
            pacing,
            next_move_at,
        })
    }

    /// Chooses the obstacle's starting cell.
    ///
    /// Cells at least `max(2, min(columns, rows) / 2)` steps (Manhattan) away
    /// from both the start and the goal corner are preferred and one is drawn
    /// uniformly. When no such cell exists the grid is scanned from the far
    /// corner toward the origin and the first cell that is neither corner is
    /// used. Grids with fewer than three cells never host an obstacle.
    pub fn spawn_cell<R>(&self, grid: &Grid, rng: &mut R) -> Option<Cell>
    where
        R: Rng + ?Sized,
    {
        if grid.cell_count() < 3 {
            return None;
        }

        let start = Cell::ORIGIN;
        let goal = Cell::new(grid.columns() - 1, grid.rows() - 1);
        let min_distance = (grid.columns().min(grid.rows()) / 2).max(2);

        let candidates: Vec<Cell> = grid
            .cells()
            .filter(|cell| *cell != start && *cell != goal)
            .filter(|cell| {
                cell.manhattan_distance(start) >= min_distance
                    && cell.manhattan_distance(goal) >= min_distance
            })
            .collect();

        if !candidates.is_empty() {
            return Some(candidates[rng.gen_range(0..candidates.len())]);
        }

        (0..grid.cell_count())
            .rev()
            .filter_map(|index| grid.cell_at(index))
            .find(|cell| *cell != start && *cell != goal)
    }

    /// Proposes the obstacle's next action.
    ///
    /// Returns `None` while the cooldown is still running. Otherwise yields a
    /// [`Command::MoveObstacle`] toward the best scored open neighbour, or a
    /// [`Command::RearmObstacle`] when every neighbour is the player or the
    /// goal.
    pub fn advance<R>(
        &self,
        obstacle: &ObstacleSnapshot,
        grid: &Grid,
        player: Cell,
        goal: Cell,
        now: Duration,
        rng: &mut R,
    ) -> Option<Command>
    where
        R: Rng + ?Sized,
    {
        if now < obstacle.next_move_at {
            return None;
        }

        let mut best: Option<(Cell, f32)> = None;
        for candidate in grid.open_neighbors(obstacle.cell) {
            if candidate == player || candidate == goal {
                continue;
            }

            let score = self.score(candidate, obstacle.previous, player, goal, rng);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        let Some((to, _)) = best else {
            return Some(Command::RearmObstacle {
                next_move_at: now.saturating_add(obstacle.pacing),
            });
        };

        Some(Command::MoveObstacle {
            to,
            next_move_at: self.jittered(now, obstacle.pacing, rng),
        })
    }

    fn score<R>(
        &self,
        candidate: Cell,
        previous: Option<Cell>,
        player: Cell,
        goal: Cell,
        rng: &mut R,
    ) -> f32
    where
        R: Rng + ?Sized,
    {
        let tuning = &self.tuning;
        let noise = rng.gen::<f32>() * tuning.random_weight;
        let backtrack = if previous == Some(candidate) {
            tuning.backtrack_penalty
        } else {
            0.0
        };

        noise
            + tuning.player_weight * candidate.manhattan_distance(player) as f32
            + tuning.goal_weight * candidate.manhattan_distance(goal) as f32
            - backtrack
    }

    fn jittered<R>(&self, now: Duration, pacing: Duration, rng: &mut R) -> Duration
    where
        R: Rng + ?Sized,
    {
        let jitter = self.tuning.jitter.min(pacing / 2);
        let jitter = i64::try_from(jitter.as_millis()).unwrap_or(0);
        let offset = if jitter > 0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0
        };
        let base = i64::try_from(pacing.as_millis()).unwrap_or(i64::MAX);
        let delay = u64::try_from(base.saturating_add(offset)).unwrap_or(0);
        now.saturating_add(Duration::from_millis(delay))
    }
}
