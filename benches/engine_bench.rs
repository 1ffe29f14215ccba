//! Criterion benchmarks for the GP engine.
//!
//! Uses a small synthetic symbolic-regression problem to measure engine
//! overhead (tree synthesis, selection, crossover, mutation) independent
//! of any real domain.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use treegp::{Engine, EngineConfig, Selection};

/// Wires an engine that approximates f(x) = x^2 + x, minimizing total
/// absolute error over a handful of sample points.
fn regression_engine(config: EngineConfig) -> Engine<f64, ()> {
    let mut engine: Engine<f64, ()> = Engine::new(config);
    engine.add_constant(1.0);
    engine.add_constant(2.0);
    engine.add_variable("x");
    engine.add_binary("add", |a, b| a + b);
    engine.add_binary("sub", |a, b| a - b);
    engine.add_binary("mul", |a, b| a * b);
    engine.set_fitness_function(|cand| {
        let mut error = 0.0;
        for i in -4..=4 {
            let x = i as f64;
            cand.set_variable("x", x);
            let y = cand.evaluate().expect("x is set");
            error += (y - (x * x + x)).abs();
        }
        if error.is_finite() {
            error
        } else {
            f64::MAX
        }
    });
    engine.set_progress_function(|_| true);
    engine
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_run");
    group.sample_size(10);

    for &pop in &[50usize, 200] {
        group.bench_with_input(BenchmarkId::new("population", pop), &pop, |b, &pop| {
            b.iter(|| {
                let config = EngineConfig::default()
                    .with_population_size(pop)
                    .with_depth_bounds(2, 4)
                    .with_min_generations(5)
                    .with_max_generations(5)
                    .with_stagnation_limit(100)
                    .with_seed(42)
                    .with_parallel(false);
                let mut engine = regression_engine(config);
                engine.find_best_solution().unwrap()
            });
        });
    }

    group.finish();
}

fn bench_selection_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection_strategy");
    group.sample_size(10);

    for selection in [Selection::Tournament(4), Selection::Roulette, Selection::Ranked] {
        group.bench_with_input(
            BenchmarkId::new("strategy", format!("{selection:?}")),
            &selection,
            |b, &selection| {
                b.iter(|| {
                    let config = EngineConfig::default()
                        .with_population_size(100)
                        .with_depth_bounds(2, 4)
                        .with_min_generations(3)
                        .with_max_generations(3)
                        .with_stagnation_limit(100)
                        .with_selection(selection)
                        .with_seed(42)
                        .with_parallel(false);
                    let mut engine = regression_engine(config);
                    engine.find_best_solution().unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_full_run, bench_selection_strategies);
criterion_main!(benches);
