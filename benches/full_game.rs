//! Benchmarks for whole simulated games and snapshots.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mafia_engine::{GameBuilder, GameConfig, MafiaGame, NullSink, PlayerId, Simulation};

const MODERATOR: PlayerId = PlayerId(u64::MAX);

fn table(players: usize, seed: u64) -> Simulation<NullSink> {
    let config = GameConfig::default().with_max_players(players.max(8));
    let game = GameBuilder::new(MODERATOR)
        .config(config)
        .seed(seed)
        .build_with_sink(NullSink)
        .unwrap();
    let mut sim = Simulation::new(game, seed, 100);
    sim.seat(players).unwrap();
    sim
}

fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");

    for players in [4, 8, 16, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, &players| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let mut sim = table(players, seed);
                black_box(sim.run().unwrap())
            });
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut sim = table(16, 42);
    sim.step().unwrap();
    sim.step().unwrap();
    let game = sim.into_game();

    c.bench_function("snapshot_encode", |b| {
        b.iter(|| black_box(game.snapshot().to_bytes().unwrap()))
    });

    let bytes = game.snapshot().to_bytes().unwrap();
    c.bench_function("snapshot_restore", |b| {
        b.iter(|| {
            let snapshot = mafia_engine::GameSnapshot::from_bytes(black_box(&bytes)).unwrap();
            black_box(MafiaGame::from_snapshot(snapshot, NullSink))
        })
    });
}

criterion_group!(benches, bench_full_game, bench_snapshot);
criterion_main!(benches);
