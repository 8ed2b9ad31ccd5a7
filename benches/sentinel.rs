//! # Sentinel Benchmarks
//!
//! Comprehensive performance benchmarks for the detector.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sentinel::{Sentinel, SentinelConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Benchmark the two request paths: admission and rejection
fn bench_process_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_paths");
    group.throughput(Throughput::Elements(1));

    group.bench_function("admit_steady", |b| {
        // Tiny window with advancing timestamps keeps the history short,
        // so this measures the steady-state admission path.
        let sentinel: Sentinel<&str> =
            Sentinel::with_config(SentinelConfig::per_window(1_000, Duration::from_millis(1)));
        let mut now = Duration::ZERO;

        b.iter(|| {
            now += Duration::from_micros(100);
            std::hint::black_box(sentinel.process_request("hot", now))
        });
    });

    group.bench_function("reject_blocked", |b| {
        let sentinel: Sentinel<&str> =
            Sentinel::with_config(SentinelConfig::per_window(1_000, Duration::from_millis(1)));
        sentinel.block("cold");

        b.iter(|| {
            std::hint::black_box(sentinel.process_request("cold", Duration::from_secs(1)))
        });
    });

    group.finish();
}

/// Benchmark request routing across growing entity populations
fn bench_entity_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_scaling");

    for num_entities in [1usize, 8, 64, 512] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_entities),
            &num_entities,
            |b, &num_entities| {
                let sentinel: Sentinel<String> = Sentinel::with_config(
                    SentinelConfig::per_window(1_000, Duration::from_millis(1)),
                );
                let keys: Vec<String> =
                    (0..num_entities).map(|i| format!("entity-{i}")).collect();
                let mut now = Duration::ZERO;
                let mut next = 0usize;

                b.iter(|| {
                    now += Duration::from_micros(100);
                    next = (next + 1) % num_entities;
                    std::hint::black_box(sentinel.process_request(keys[next].clone(), now))
                });
            },
        );
    }

    group.finish();
}

/// Benchmark concurrent traffic hammering a single entity
fn bench_contended_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_process");

    for num_threads in [2, 4, 8] {
        group.throughput(Throughput::Elements(num_threads as u64 * 1_000));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_threads", num_threads)),
            &num_threads,
            |b, &num_threads| {
                b.iter_custom(|iters| {
                    let mut total_duration = Duration::ZERO;

                    for _ in 0..iters {
                        // Fresh detector per iteration so history never
                        // accumulates across runs.
                        let sentinel: Arc<Sentinel<&str>> = Arc::new(Sentinel::with_config(
                            SentinelConfig::per_window(1_000_000, Duration::from_millis(1)),
                        ));

                        let start = std::time::Instant::now();

                        let handles: Vec<_> = (0..num_threads)
                            .map(|_| {
                                let sentinel = Arc::clone(&sentinel);
                                thread::spawn(move || {
                                    for _ in 0..1_000 {
                                        sentinel.process("hot");
                                    }
                                })
                            })
                            .collect();

                        for handle in handles {
                            handle.join().unwrap();
                        }

                        total_duration += start.elapsed();
                    }

                    total_duration
                });
            },
        );
    }

    group.finish();
}

/// Benchmark concurrent traffic spread across many entities
fn bench_parallel_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_entities");

    for num_threads in [2, 4, 8] {
        group.throughput(Throughput::Elements(num_threads as u64 * 1_000));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_threads", num_threads)),
            &num_threads,
            |b, &num_threads| {
                b.iter_custom(|iters| {
                    let mut total_duration = Duration::ZERO;

                    for _ in 0..iters {
                        let sentinel: Arc<Sentinel<usize>> = Arc::new(Sentinel::with_config(
                            SentinelConfig::per_window(1_000_000, Duration::from_millis(1)),
                        ));

                        let start = std::time::Instant::now();

                        let handles: Vec<_> = (0..num_threads)
                            .map(|thread_id| {
                                let sentinel = Arc::clone(&sentinel);
                                thread::spawn(move || {
                                    for _ in 0..1_000 {
                                        sentinel.process(thread_id);
                                    }
                                })
                            })
                            .collect();

                        for handle in handles {
                            handle.join().unwrap();
                        }

                        total_duration += start.elapsed();
                    }

                    total_duration
                });
            },
        );
    }

    group.finish();
}

/// Benchmark read-only introspection over a populated detector
fn bench_introspection(c: &mut Criterion) {
    let mut group = c.benchmark_group("introspection");

    group.bench_function("stats_1000_entities", |b| {
        let sentinel: Sentinel<String> =
            Sentinel::with_config(SentinelConfig::per_window(100, Duration::from_secs(10)));
        for i in 0..1_000 {
            sentinel.process_request(format!("entity-{i}"), Duration::from_secs(1));
        }

        b.iter(|| std::hint::black_box(sentinel.stats()));
    });

    group.bench_function("snapshot_1000_entities", |b| {
        let sentinel: Sentinel<String> =
            Sentinel::with_config(SentinelConfig::per_window(100, Duration::from_secs(10)));
        for i in 0..1_000 {
            sentinel.process_request(format!("entity-{i}"), Duration::from_secs(1));
        }

        b.iter(|| std::hint::black_box(sentinel.snapshot()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_process_paths,
    bench_entity_scaling,
    bench_contended_process,
    bench_parallel_entities,
    bench_introspection,
);

criterion_main!(benches);
