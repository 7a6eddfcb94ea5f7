//! Benchmarks for the monster tick and the exploration loop.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use wayfarer::{
    tick_monsters, Direction, ExplorationSession, GridWorldState, MapEvent, Position,
};

fn crowded_world(grid_size: i32, monsters: usize) -> GridWorldState {
    let mut rng = StdRng::seed_from_u64(42);
    let centre = Position::new(grid_size / 2, grid_size / 2);
    let mut world = GridWorldState::new(grid_size, Position::origin(), centre);
    world.populate_monsters(monsters, &mut rng);
    world
}

fn bench_tick_default_map(c: &mut Criterion) {
    let world = crowded_world(10, 2);
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("tick_10x10_2_monsters", |b| {
        b.iter(|| {
            let mut world = world.clone();
            tick_monsters(black_box(&mut world), &mut rng);
            black_box(world)
        });
    });
}

fn bench_tick_crowded_map(c: &mut Criterion) {
    let world = crowded_world(40, 200);
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("tick_40x40_200_monsters", |b| {
        b.iter(|| {
            let mut world = world.clone();
            tick_monsters(black_box(&mut world), &mut rng);
            black_box(world)
        });
    });
}

fn bench_session_walk(c: &mut Criterion) {
    let world = crowded_world(40, 50);
    let walk = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    c.bench_function("session_100_moves", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(9);
            let mut session = ExplorationSession::enter(world.clone());
            for direction in walk.iter().cycle().take(100) {
                if session
                    .handle(MapEvent::Move(*direction), &mut rng)
                    .is_some()
                {
                    break;
                }
            }
            black_box(session.world().player_move_count())
        });
    });
}

criterion_group!(
    benches,
    bench_tick_default_map,
    bench_tick_crowded_map,
    bench_session_walk
);
criterion_main!(benches);
