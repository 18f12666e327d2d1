#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Maze Run in the terminal.

mod game;
mod settings;
mod terminal;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use maze_run_core::{Cell, DifficultyTier, Phase, RenderableState, WELCOME_BANNER};
use maze_run_rendering::{render_ascii, RenderingBackend, Scene};
use maze_run_system_generation::generate;
use maze_run_system_progression::{Config, Session};
use maze_run_world::navigation::shortest_path;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    game::Game,
    settings::{Settings, DEFAULT_SETTINGS_PATH},
    terminal::TerminalBackend,
};

/// Perfect-maze runner played in the terminal.
#[derive(Parser, Debug)]
#[command(name = "maze-run", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Mode>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play interactively (the default).
    Play(PlayArgs),
    /// Print a freshly generated maze.
    Generate(MazeArgs),
    /// Print a generated maze together with its solution.
    Solve(MazeArgs),
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Seed for reproducible mazes and obstacle walks.
    #[arg(long)]
    seed: Option<u64>,

    /// Difficulty tier deciding the starting level of a fresh run.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    tier: Option<u8>,

    /// Level to start on, overriding the tier and saved progress.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    level: Option<u32>,

    /// Settings file holding the tier, hint preference and progress.
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Save the level after every transition and resume from it next time.
    #[arg(long)]
    remember_progress: bool,

    /// Simulated 16 ms frames played for every key.
    #[arg(long, default_value_t = 8)]
    frames_per_input: u32,
}

#[derive(Args, Debug)]
struct MazeArgs {
    /// Number of columns and rows.
    #[arg(long, default_value_t = 11, value_parser = clap::value_parser!(u32).range(2..=64))]
    size: u32,

    /// Seed for a reproducible maze.
    #[arg(long)]
    seed: Option<u64>,
}

/// Entry point for the Maze Run command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Mode::Play(cli.play)) {
        Mode::Play(args) => play(args),
        Mode::Generate(args) => print_maze(&args, false),
        Mode::Solve(args) => print_maze(&args, true),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let mut settings = Settings::load_or_default(&args.settings);
    if let Some(tier) = args.tier {
        settings.tier = DifficultyTier::try_from(tier).context("invalid difficulty tier")?;
    }
    if args.remember_progress {
        settings.remember_progress = true;
    }

    let level = args.level.unwrap_or_else(|| settings.starting_level());
    let session = match args.seed {
        Some(seed) => Session::seeded(Config::default(), seed),
        None => Session::from_entropy(Config::default()),
    };
    info!(
        "starting on level {level} (tier {}, seed {:?})",
        settings.tier.number(),
        args.seed
    );

    let mut game = Game::new(session, settings, args.settings);
    let scene = game.start(level);

    println!("{WELCOME_BANNER}");
    let backend = TerminalBackend::new(io::stdin().lock(), io::stdout().lock(), args.frames_per_input);
    backend.run(scene, move |delta, input, scene| game.update(delta, input, scene))
}

fn print_maze(args: &MazeArgs, solve: bool) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let grid = generate(args.size, args.size, &mut rng);
    let goal = Cell::new(args.size - 1, args.size - 1);
    let path = if solve {
        shortest_path(&grid, Cell::ORIGIN, goal)
    } else {
        Vec::new()
    };

    let state = RenderableState {
        level: 1,
        phase: Phase::Playing,
        grid: &grid,
        player: Cell::ORIGIN,
        goal,
        obstacle: None,
        hint_enabled: solve,
    };
    let scene = Scene::new(&state, path);

    let mut out = io::stdout().lock();
    write!(out, "{}", render_ascii(&scene))?;
    if solve {
        writeln!(out, "solution: {} moves", scene.hint.len().saturating_sub(1))?;
    }
    out.flush().context("failed to flush maze output")
}
