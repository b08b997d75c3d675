use ai_2048_search::agent::heuristic::{self, HeuristicWeights};
use ai_2048_search::engine::{Board, Direction};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(1337);
    let mut boards = Vec::new();
    let mut b = Board::new(&mut rng);
    boards.push(b);
    for i in 0..48 {
        let dir = Direction::ALL[i % 4];
        if b.apply_move(dir).changed {
            b.spawn_tile(&mut rng);
        }
        boards.push(b);
    }
    boards
}

fn bench_heuristic(c: &mut Criterion) {
    let boards = corpus();
    let default = HeuristicWeights::default();
    let all_on = HeuristicWeights { position: 2.0, chain: 2.0, ..Default::default() };

    c.bench_function("heuristic/default", |bch| {
        bch.iter(|| {
            let mut acc = 0f64;
            for bd in &boards {
                acc += heuristic::evaluate(bd, &default);
            }
            black_box(acc)
        })
    });

    c.bench_function("heuristic/all_metrics", |bch| {
        bch.iter(|| {
            let mut acc = 0f64;
            for bd in &boards {
                acc += heuristic::evaluate(bd, &all_on);
            }
            black_box(acc)
        })
    });
}

criterion_group!(heuristic_benches, bench_heuristic);
criterion_main!(heuristic_benches);
