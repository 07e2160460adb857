//! Criterion benchmarks for pattern enumeration, model construction and the
//! bundled solver on the 5x5 example puzzle.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use number_cross::compose::PuzzleModel;
use number_cross::cp::{BacktrackingSolver, SolverConfig};
use number_cross::grid::GridLayout;
use number_cross::predicate::{Predicate, RunPredicate};
use number_cross::tiling::{enumerate, TilingCache};

const EXAMPLE: &str = "\
0 0 0 0 0
1 0 0 0 0
1 1 0 0 0
2 1 1 0 0
2 2 1 1 0

x x . . .
x . . . .
. . . . .
. . . . x
. . . x x
";

fn example_predicates() -> Vec<Predicate> {
    [11, 14, 28, 101, 2025]
        .into_iter()
        .map(Predicate::divisible_by)
        .collect()
}

fn example_model(cache: &mut TilingCache) -> PuzzleModel {
    let layout = GridLayout::parse(EXAMPLE).expect("valid layout");
    let mut puzzle = PuzzleModel::with_cache(layout, cache);
    let predicates = example_predicates();
    puzzle
        .apply_rows(
            predicates
                .iter()
                .enumerate()
                .map(|(row, p)| (row, p as &dyn RunPredicate)),
        )
        .expect("rows in range");
    puzzle.apply_uniqueness();
    puzzle
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling_enumerate");
    for n in [5usize, 8, 11, 14] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| enumerate(black_box(n)).len())
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut cache = TilingCache::new();
    c.bench_function("build_example", |b| {
        b.iter(|| example_model(&mut cache).model().constraint_count())
    });
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_example");
    group.sample_size(10);
    let mut cache = TilingCache::new();
    let puzzle = example_model(&mut cache);
    let config = SolverConfig::default();
    group.bench_function("first_solution", |b| {
        b.iter(|| {
            puzzle
                .solve(&BacktrackingSolver, &config, |_| {})
                .stats
                .nodes
        })
    });
    group.finish();
}

criterion_group!(benches, bench_enumerate, bench_build, bench_solve);
criterion_main!(benches);
