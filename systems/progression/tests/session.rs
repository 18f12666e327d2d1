use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use maze_run_core::{Cell, Direction, Event, MoveRejection, Phase};
use maze_run_system_progression::{Config, Session};
use maze_run_world::{navigation, query};

const STEP: Duration = Duration::from_millis(100);
const FRAME: Duration = Duration::from_millis(16);

fn walk(session: &mut Session, path: &[Cell], mut now: Duration) -> (Vec<Event>, Duration) {
    let mut last = Vec::new();
    for pair in path.windows(2) {
        let direction = Direction::between(pair[0], pair[1]).expect("path cells are adjacent");
        now += STEP;
        last = session.request_move(direction, now);
        assert!(
            matches!(last.first(), Some(Event::PlayerMoved { .. })),
            "step {pair:?} rejected: {last:?}"
        );
    }
    (last, now)
}

#[test]
fn following_the_hint_completes_the_level() {
    let mut session = Session::seeded(Config::default(), 1);
    let started = session.new_level(1);
    assert!(matches!(
        started.as_slice(),
        [Event::LevelStarted {
            level: 1,
            columns: 5,
            rows: 5,
            obstacle: None,
        }]
    ));

    let path = session.hint_path();
    assert_eq!(path.first(), Some(&Cell::ORIGIN));
    assert_eq!(path.last(), Some(&Cell::new(4, 4)));

    let (events, _) = walk(&mut session, &path, Duration::ZERO);
    assert_eq!(events.len(), 3, "{events:?}");
    assert_eq!(events[1], Event::LevelWon { level: 1 });
    assert!(matches!(
        events[2],
        Event::LevelStarted {
            level: 2,
            columns: 5,
            rows: 5,
            ..
        }
    ));

    assert_eq!(session.level(), 2);
    let state = session.renderable_state();
    assert_eq!(state.phase, Phase::Playing);
    assert_eq!(state.player, Cell::ORIGIN);
    assert!(state.hint_enabled);
}

#[test]
fn blocked_move_leaves_the_player_in_place() {
    let mut session = Session::seeded(Config::default(), 2);
    let _ = session.new_level(1);

    let events = session.request_move(Direction::North, STEP);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            direction: Direction::North,
            reason: MoveRejection::Blocked,
        }]
    );
    let state = session.renderable_state();
    assert_eq!(state.player, Cell::ORIGIN);
    assert_eq!(state.phase, Phase::Playing);
}

#[test]
fn rapid_moves_are_debounced() {
    let mut session = Session::seeded(Config::default(), 3);
    let _ = session.new_level(1);
    let path = session.hint_path();
    let first = Direction::between(path[0], path[1]).expect("adjacent");
    let second = Direction::between(path[1], path[2]).expect("adjacent");

    assert!(matches!(
        session.request_move(first, STEP).as_slice(),
        [Event::PlayerMoved { .. }]
    ));
    assert_eq!(
        session.request_move(second, STEP + Duration::from_millis(30)),
        vec![Event::MoveRejected {
            direction: second,
            reason: MoveRejection::Debounced,
        }]
    );
    assert!(matches!(
        session.request_move(second, STEP + Duration::from_millis(60)).as_slice(),
        [Event::PlayerMoved { .. }]
    ));
}

#[test]
fn obstacle_appears_from_level_ten() {
    let mut session = Session::seeded(Config::default(), 4);

    let events = session.new_level(9);
    assert!(matches!(
        events.as_slice(),
        [Event::LevelStarted {
            level: 9,
            obstacle: None,
            ..
        }]
    ));
    assert!(query::obstacle(session.world()).is_none());

    let events = session.new_level(10);
    let Some(Event::LevelStarted {
        level: 10,
        obstacle: Some(cell),
        ..
    }) = events.first()
    else {
        panic!("level 10 should host an obstacle: {events:?}");
    };
    assert_ne!(*cell, Cell::ORIGIN);
    assert_ne!(*cell, query::goal(session.world()));
    assert_eq!(session.renderable_state().obstacle, Some(*cell));
}

#[test]
fn walking_into_the_obstacle_regenerates_the_same_level() {
    for seed in 0..64 {
        let mut session = Session::seeded(Config::default(), seed);
        let _ = session.new_level(10);

        let world = session.world();
        let obstacle = query::obstacle(world).expect("obstacle on level 10").cell;
        let goal = query::goal(world);
        let path = navigation::shortest_path(query::grid(world), Cell::ORIGIN, obstacle);
        if path.contains(&goal) {
            continue;
        }

        let (events, _) = walk(&mut session, &path, Duration::ZERO);
        assert_eq!(
            &events[..2],
            &[
                Event::PlayerMoved {
                    from: path[path.len() - 2],
                    to: obstacle,
                },
                Event::LevelLost {
                    level: 10,
                    cell: obstacle,
                },
            ]
        );
        assert!(matches!(
            events.get(2),
            Some(Event::LevelStarted { level: 10, .. })
        ));
        assert_eq!(session.level(), 10);
        assert_eq!(session.renderable_state().player, Cell::ORIGIN);
        return;
    }
    panic!("no seed produced an obstacle reachable without crossing the goal");
}

#[test]
fn ticks_move_the_obstacle_after_its_cooldown() {
    let mut session = Session::seeded(Config::default(), 5);
    let _ = session.new_level(12);
    let spawn = query::obstacle(session.world()).expect("obstacle on level 12");

    let mut now = Duration::ZERO;
    let mut moved = Vec::new();
    while now < Duration::from_secs(3) {
        now += FRAME;
        for event in session.tick(now) {
            match event {
                Event::ObstacleMoved { .. } => moved.push(now),
                Event::TimeAdvanced { .. } => {}
                other => panic!("unexpected event while idling: {other:?}"),
            }
        }
    }

    let first = *moved.first().expect("obstacle moved at least once");
    assert!(first >= spawn.next_move_at);
    assert!(moved.len() >= 3, "only {} moves in 3s", moved.len());
    assert_eq!(query::phase(session.world()), Phase::Playing);
}

#[test]
fn hint_preference_survives_levels_and_restarts() {
    let mut session = Session::seeded(Config::default(), 6);
    let _ = session.new_level(3);
    assert!(!session.renderable_state().hint_enabled);
    assert!(session.hint_path().is_empty());

    assert_eq!(session.toggle_hint(), vec![Event::HintToggled { enabled: true }]);
    assert!(!session.hint_path().is_empty());

    let restarted = session.restart();
    assert!(matches!(
        restarted.as_slice(),
        [Event::LevelStarted { level: 3, .. }]
    ));
    assert!(session.renderable_state().hint_enabled);

    let _ = session.new_level(4);
    assert!(session.renderable_state().hint_enabled);

    let _ = session.set_hint(false);
    let _ = session.new_level(5);
    assert!(!session.renderable_state().hint_enabled);

    let _ = session.new_level(2);
    assert!(session.renderable_state().hint_enabled);
}

#[test]
fn identical_seeds_replay_identically() {
    fn script(seed: u64) -> u64 {
        let mut session = Session::seeded(Config::default(), seed);
        let mut log = session.new_level(10);
        let mut now = Duration::ZERO;
        let directions = [Direction::East, Direction::South];
        for frame in 0..400u32 {
            now += FRAME;
            log.extend(session.tick(now));
            if frame % 7 == 0 {
                let direction = directions[(frame as usize / 7) % directions.len()];
                log.extend(session.request_move(direction, now));
            }
        }
        let mut hasher = DefaultHasher::new();
        log.hash(&mut hasher);
        hasher.finish()
    }

    assert_eq!(script(77), script(77));
    assert_ne!(script(77), script(78));
}
