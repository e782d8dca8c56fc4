//! Criterion benchmarks for filling collections.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use polyseg::{CollectionConfig, PolyCollection};
use polyseg_bench::{BoxedProbes, ProbeBag};
use polyseg_test_utils::{fill_round_robin, Probe};

const N: u32 = 100_000;

/// Benchmark: insert 100K round-robin fixtures into each collection kind.
fn bench_insert(c: &mut Criterion) {
    c.bench_function("insert_boxed_100k", |b| {
        b.iter(|| {
            let mut coll = BoxedProbes::new();
            fill_round_robin(&mut coll, N);
            black_box(coll.len())
        });
    });

    c.bench_function("insert_poly_100k", |b| {
        b.iter(|| {
            let mut coll = PolyCollection::<dyn Probe>::new();
            fill_round_robin(&mut coll, N);
            black_box(coll.len())
        });
    });

    let presized = CollectionConfig::new().with_initial_segment_capacity(N as usize / 3 + 1);
    c.bench_function("insert_poly_presized_100k", |b| {
        b.iter_batched(
            || PolyCollection::<dyn Probe>::with_config(presized.clone()),
            |mut coll| {
                fill_round_robin(&mut coll, N);
                black_box(coll.len())
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("insert_static_100k", |b| {
        b.iter(|| {
            let mut coll = ProbeBag::new();
            fill_round_robin(&mut coll, N);
            black_box(coll.len())
        });
    });
}

criterion_group!(benches, bench_insert);
criterion_main!(benches);
