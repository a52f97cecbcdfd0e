//! Criterion benchmarks measure time of the clearly separated pieces of code.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oxo::game::core::Player;
use oxo::game::position::Position;
use oxo::search::rollout::play_out;
use oxo::search::{Config, Mcts};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn positions() -> Vec<(&'static str, Position)> {
    vec![
        ("empty", Position::empty()),
        (
            "midgame",
            Position::from_bits(0b100_000_001, 0b000_010_100, Player::X).unwrap(),
        ),
    ]
}

fn rollout(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollout");
    group.throughput(Throughput::Elements(1));
    for (name, position) in positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        group.bench_with_input(BenchmarkId::new("play_out", name), &position, |b, position| {
            b.iter(|| criterion::black_box(play_out(*position, &mut rng)));
        });
    }
    group.finish();
}

fn search(c: &mut Criterion) {
    const ITERATIONS: u32 = 1000;

    let mut group = c.benchmark_group("search");
    group.throughput(Throughput::Elements(u64::from(ITERATIONS)));
    for (name, position) in positions() {
        group.bench_with_input(
            BenchmarkId::new(format!("{ITERATIONS} iterations"), name),
            &position,
            |b, position| {
                b.iter(|| {
                    let mut mcts = Mcts::from_position(
                        *position,
                        Config::default(),
                        ChaCha8Rng::seed_from_u64(0),
                    );
                    criterion::black_box(mcts.run_iterations(ITERATIONS))
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = mcts;
    config = Criterion::default().sample_size(50);
    targets = rollout, search
}

criterion_main!(mcts);
