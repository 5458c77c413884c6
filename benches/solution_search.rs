//! Criterion benchmarks for spawning: value adjustment plus solution search.
//!
//! Run with:
//!     cargo bench --bench solution_search

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use xorchain_engine::engine::grid::Grid;
use xorchain_engine::engine::solver::{adjust_spawn_value, find_solutions, SolverConfig};
use xorchain_engine::engine::tables::LEVELS;
use xorchain_engine::{Coord, GameMode, Session};

fn bench_fresh_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_solutions_fresh");
    let config = SolverConfig::default();
    for (i, &(width, max_bits)) in LEVELS.iter().enumerate() {
        group.bench_with_input(BenchmarkId::from_parameter(format!("level{}", i + 1)), &i, |b, _| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                let mut rng = StdRng::seed_from_u64(seed);
                let mut grid = Grid::new(width, max_bits);
                adjust_spawn_value(&mut grid, Coord::ORIGIN, &mut rng);
                find_solutions(&mut grid, Coord::ORIGIN, &config, &mut rng)
            });
        });
    }
    group.finish();
}

fn bench_populated_viewport(c: &mut Criterion) {
    // Every target in view already exists, so only cells beyond the
    // viewport can be rewritten and the search has to go further.
    let mut group = c.benchmark_group("find_solutions_populated");
    let config = SolverConfig::default();
    for level in [1usize, 4, 8] {
        let mode = GameMode::level(level);
        let mut session = Session::new(mode, config, 7);
        session.visible_targets();
        let grid = session.grid().clone();
        group.bench_with_input(BenchmarkId::from_parameter(format!("level{level}")), &level, |b, _| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                let mut rng = StdRng::seed_from_u64(seed);
                let mut g = grid.clone();
                find_solutions(&mut g, Coord::ORIGIN, &config, &mut rng)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fresh_grid, bench_populated_viewport);
criterion_main!(benches);
