use std::collections::VecDeque;

use maze_run_core::{Cell, Direction, Grid};
use maze_run_system_generation::{generate, CarveStep, Carver};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SIZES: [(u32, u32); 7] = [(2, 2), (3, 2), (5, 5), (7, 4), (1, 9), (9, 1), (19, 19)];

#[test]
fn generated_mazes_are_spanning_trees() {
    for seed in 0..16 {
        for (columns, rows) in SIZES {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(columns, rows, &mut rng);
            let cells = (columns * rows) as usize;

            assert_eq!(
                grid.open_edge_count(),
                cells - 1,
                "{columns}x{rows} seed {seed} edge count"
            );

            for start in [Cell::ORIGIN, Cell::new(columns - 1, rows - 1)] {
                assert_eq!(
                    reachable_once(&grid, start),
                    cells,
                    "{columns}x{rows} seed {seed} reachability from {start:?}"
                );
            }
        }
    }
}

#[test]
fn walls_are_symmetric_and_border_stays_closed() {
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(9, 7, &mut rng);

        for cell in grid.cells() {
            let walls = grid.walls(cell).expect("cell inside grid");
            for direction in Direction::ALL {
                match grid.neighbor(cell, direction) {
                    Some(neighbor) => {
                        let facing = grid.walls(neighbor).expect("neighbour inside grid");
                        assert_eq!(
                            walls.has(direction),
                            facing.has(direction.opposite()),
                            "asymmetric wall between {cell:?} and {neighbor:?}"
                        );
                    }
                    None => assert!(
                        walls.has(direction),
                        "border wall of {cell:?} facing {direction:?} was removed"
                    ),
                }
            }
        }
    }
}

#[test]
fn same_seed_reproduces_the_same_maze() {
    let first = generate(11, 11, &mut ChaCha8Rng::seed_from_u64(0x5eed));
    let second = generate(11, 11, &mut ChaCha8Rng::seed_from_u64(0x5eed));
    assert_eq!(first, second);

    let other = generate(11, 11, &mut ChaCha8Rng::seed_from_u64(0x5eee));
    assert_ne!(first, other, "different seeds should produce different mazes");
}

#[test]
fn corridor_grids_degenerate_to_a_single_line() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let grid = generate(6, 1, &mut rng);
    for column in 0..5 {
        assert!(grid.is_open(Cell::new(column, 0), Direction::East));
    }
    assert_eq!(grid.open_edge_count(), 5);
}

#[test]
fn partial_states_keep_the_stack_connected() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut carver = Carver::new(6, 5);
    let mut carved = 0;
    let mut backtracked = 0;

    loop {
        let step = carver.step(&mut rng);
        match step {
            CarveStep::Carved { from, to } => {
                carved += 1;
                let direction = Direction::between(from, to).expect("adjacent cells");
                assert!(carver.grid().is_open(from, direction));
                assert_eq!(carver.stack().last(), Some(&to));
            }
            CarveStep::Backtracked { cell } => {
                backtracked += 1;
                assert!(!carver.stack().contains(&cell));
            }
            CarveStep::Finished => break,
        }

        for pair in carver.stack().windows(2) {
            let direction = Direction::between(pair[0], pair[1]).expect("stack cells adjacent");
            assert!(carver.grid().is_open(pair[0], direction));
        }
        assert_eq!(carver.grid().open_edge_count(), carved);
        let visited = carver.grid().cells().filter(|cell| carver.is_visited(*cell)).count();
        assert_eq!(visited, carved + 1);
    }

    assert_eq!(carved, 29);
    assert_eq!(backtracked, 30, "every cell is popped exactly once");
}

fn reachable_once(grid: &Grid, start: Cell) -> usize {
    let mut seen = vec![false; grid.cell_count()];
    let mut queue = VecDeque::from([start]);
    let mut visits = 0;
    seen[grid.index_of(start).expect("start inside grid")] = true;

    while let Some(cell) = queue.pop_front() {
        visits += 1;
        for neighbor in grid.open_neighbors(cell) {
            let index = grid.index_of(neighbor).expect("neighbour inside grid");
            if !seen[index] {
                seen[index] = true;
                queue.push_back(neighbor);
            }
        }
    }

    visits
}
