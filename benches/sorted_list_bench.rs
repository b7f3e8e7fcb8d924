//! SortedList insertion and lookup benchmarks.
//!
//! Compares deferred insertion (`add`) against immediate placement
//! (`insert`) and a sort-on-every-insert baseline, for appending and
//! random-order workloads, and measures range lookups after a resort.
//!
//! Input vectors are generated once per size and cloned in setup so every
//! iteration sees the same data.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use lazysorted::{SortedList, ThresholdPolicy};
use std::hint::black_box;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

/// Deterministic scrambled sequence (multiplicative hashing of the index).
fn generate_scrambled(size: usize) -> Vec<u64> {
    (0..size as u64)
        .map(|index| index.wrapping_mul(0x9E37_79B9_7F4A_7C15) % (size as u64 * 4))
        .collect()
}

fn generate_ascending(size: usize) -> Vec<u64> {
    (0..size as u64).collect()
}

fn batch_size_for(size: usize) -> BatchSize {
    if size < 1_000 {
        BatchSize::SmallInput
    } else {
        BatchSize::LargeInput
    }
}

fn benchmark_add_scrambled(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("sorted_list_add_scrambled");

    for size in SIZES {
        let base = generate_scrambled(size);
        group.bench_with_input(BenchmarkId::new("add_default_threshold", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || base.clone(),
                |values| {
                    let mut list = SortedList::new();
                    list.merge(values);
                    black_box(list.restore_sorted_order())
                },
                batch_size_for(size),
            );
        });

        group.bench_with_input(BenchmarkId::new("add_eager", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || base.clone(),
                |values| {
                    let mut list = SortedList::new().with_threshold(ThresholdPolicy::EAGER);
                    list.merge(values);
                    black_box(list.len())
                },
                batch_size_for(size),
            );
        });

        group.bench_with_input(BenchmarkId::new("insert", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || base.clone(),
                |values| {
                    let mut list = SortedList::new();
                    for value in values {
                        list.insert(value);
                    }
                    black_box(list.len())
                },
                batch_size_for(size),
            );
        });
    }

    group.finish();
}

fn benchmark_add_ascending(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("sorted_list_add_ascending");

    for size in SIZES {
        let base = generate_ascending(size);
        group.bench_with_input(BenchmarkId::new("add", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || base.clone(),
                |values| {
                    let mut list = SortedList::new();
                    list.merge(values);
                    black_box(list.pending_len())
                },
                batch_size_for(size),
            );
        });

        group.bench_with_input(BenchmarkId::new("vec_push_sort", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || base.clone(),
                |values| {
                    let mut sorted = Vec::with_capacity(values.len());
                    for value in values {
                        sorted.push(value);
                        sorted.sort_unstable();
                    }
                    black_box(sorted.len())
                },
                batch_size_for(size),
            );
        });
    }

    group.finish();
}

fn benchmark_find_key_range(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("sorted_list_find_key_range");

    for size in SIZES {
        let mut list: SortedList<u64> = generate_scrambled(size).into_iter().collect();
        let probes = generate_scrambled(64);
        group.bench_with_input(BenchmarkId::new("find_key_range", size), &size, |bencher, _| {
            bencher.iter(|| {
                let view = list.view();
                for probe in &probes {
                    black_box(view.find_key_range(black_box(probe)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_add_scrambled,
    benchmark_add_ascending,
    benchmark_find_key_range
);
criterion_main!(benches);
