//! Benchmarks for the preflop solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use preflop_solver::cards::parse_cards;
use preflop_solver::{Evaluator, PreflopSolver, SolverConfig};

fn evaluator_benchmark(c: &mut Criterion) {
    let evaluator = Evaluator::new();
    let cards = parse_cards("AsKdQh9c7s2d3h").unwrap();
    let seven = [
        cards[0], cards[1], cards[2], cards[3], cards[4], cards[5], cards[6],
    ];

    c.bench_function("best_hand_seven_cards", |b| {
        b.iter(|| black_box(evaluator.best_hand(&seven)))
    });
}

fn training_benchmark(c: &mut Criterion) {
    c.bench_function("train_single_deal_100bb", |b| {
        let config = SolverConfig::default().with_seed(42);
        let mut solver = PreflopSolver::new(config).unwrap();
        b.iter(|| {
            solver.train(1);
            black_box(solver.iterations())
        })
    });

    c.bench_function("train_100_deals_100bb", |b| {
        b.iter(|| {
            let config = SolverConfig::default().with_seed(42);
            let mut solver = PreflopSolver::new(config).unwrap();
            solver.train(black_box(100))
        })
    });
}

criterion_group!(benches, evaluator_benchmark, training_benchmark);
criterion_main!(benches);
