use std::time::Duration;

use maze_run_core::{Cell, Command, Event, Phase};
use maze_run_system_generation::generate;
use maze_run_system_pursuit::{Pursuit, PursuitTuning};
use maze_run_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn obstacle_patrols_without_touching_player_or_goal() {
    let pursuit = Pursuit::default();

    for seed in 0..8 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(11, 11, &mut rng);
        let spawn = pursuit
            .spawn(10, &grid, Duration::ZERO, &mut rng)
            .expect("level 10 hosts an obstacle");

        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::BeginLevel {
                level: 10,
                grid,
                obstacle: Some(spawn),
            },
            &mut events,
        );

        let player = query::player(&world);
        let goal = query::goal(&world);
        let mut moves = 0;
        let mut now = Duration::ZERO;

        for _ in 0..2_000 {
            now += FRAME;
            events.clear();
            world::apply(&mut world, Command::Tick { now }, &mut events);

            let obstacle = query::obstacle(&world).expect("obstacle stays on the board");
            let free = query::grid(&world)
                .open_neighbors(obstacle.cell)
                .any(|cell| cell != player && cell != goal);

            let proposal = pursuit.advance(
                &obstacle,
                query::grid(&world),
                player,
                goal,
                now,
                &mut rng,
            );

            match proposal {
                None => assert!(now < obstacle.next_move_at, "seed {seed}: idle past cooldown"),
                Some(Command::MoveObstacle { to, next_move_at }) => {
                    assert!(free, "seed {seed}: moved without a free neighbour");
                    assert!(next_move_at > now);
                    events.clear();
                    world::apply(
                        &mut world,
                        Command::MoveObstacle { to, next_move_at },
                        &mut events,
                    );
                    assert_eq!(
                        events,
                        vec![Event::ObstacleMoved {
                            from: obstacle.cell,
                            to,
                        }],
                        "seed {seed}: world rejected a proposed step"
                    );
                    moves += 1;
                }
                Some(Command::RearmObstacle { next_move_at }) => {
                    assert!(!free, "seed {seed}: rearmed despite a free neighbour");
                    assert_eq!(next_move_at, now + obstacle.pacing);
                    world::apply(
                        &mut world,
                        Command::RearmObstacle { next_move_at },
                        &mut events,
                    );
                }
                Some(other) => panic!("unexpected proposal {other:?}"),
            }

            let cell = query::obstacle(&world).map(|o| o.cell);
            assert_ne!(cell, Some(goal), "seed {seed}: obstacle entered the goal");
            assert_ne!(cell, Some(player), "seed {seed}: obstacle caught a static player");
            assert_eq!(query::phase(&world), Phase::Playing);
        }

        assert!(moves >= 50, "seed {seed}: only {moves} moves in 32 seconds");
    }
}

#[test]
fn spawn_cells_avoid_both_corners_on_every_playable_size() {
    let pursuit = Pursuit::default();
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for size in (5..=19).step_by(2) {
        let grid = generate(size, size, &mut rng);
        for _ in 0..32 {
            let cell = pursuit.spawn_cell(&grid, &mut rng).expect("room for an obstacle");
            let threshold = (size / 2).max(2);
            assert!(cell.manhattan_distance(Cell::ORIGIN) >= threshold);
            assert!(cell.manhattan_distance(Cell::new(size - 1, size - 1)) >= threshold);
        }
    }
}

#[test]
fn custom_threshold_moves_the_first_obstacle_level() {
    let pursuit = Pursuit::new(PursuitTuning {
        spawn_level: 3,
        ..PursuitTuning::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let grid = generate(7, 7, &mut rng);

    assert!(pursuit.spawn(2, &grid, Duration::ZERO, &mut rng).is_none());
    let spawn = pursuit
        .spawn(3, &grid, Duration::ZERO, &mut rng)
        .expect("obstacle from level 3");
    assert_eq!(spawn.pacing, Duration::from_millis(520));
}
