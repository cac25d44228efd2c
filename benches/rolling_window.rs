//! benches/rolling_window.rs
//! Run with:  cargo bench --bench rolling_window
//! HTML:      target/criterion/report/index.html

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use market_microstructure_sim::stats::{RollingWindowStats, WINDOW_CAPACITY};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

// ────────────────────────────────────────────────────────────────────────────
//  Parameter grids
// ────────────────────────────────────────────────────────────────────────────
const APPEND_COUNTS: &[usize] = &[1_080, 14_400, 144_000];
const LOOKBACKS: &[usize] = &[30, 180, 1_080];

/// A full window of random-walk prices around 27.
fn setup_window() -> RollingWindowStats {
    let mut rng = StdRng::seed_from_u64(42);
    let mut window = RollingWindowStats::default();
    let mut price = 27.0;
    for _ in 0..WINDOW_CAPACITY {
        price += rng.gen_range(-0.01..0.01);
        window.append(price);
    }
    window
}

pub fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_window_append");

    for &n in APPEND_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter_batched(
                RollingWindowStats::default,
                |mut window| {
                    for i in 0..n {
                        window.append(black_box(27.0 + (i % 7) as f64 * 0.01));
                    }
                    black_box(window);
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

pub fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_window_query");
    let window = setup_window();

    for &t in LOOKBACKS {
        group.bench_function(BenchmarkId::new("average_and_std", t), |b| {
            b.iter(|| {
                let ma = window.moving_average(black_box(t));
                let sd = window.moving_std(black_box(t));
                black_box((ma, sd))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append, bench_queries);
criterion_main!(benches);
