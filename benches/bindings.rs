//! Benchmarks for spark-bindings
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use spark_bindings::{bind, install, record, resolve_read, resolve_write, Record, Value};

fn chain() -> Record {
    let root = record! { "a" => record! { "b" => record! { "c" => 0 } } };
    install(&root);
    root
}

fn wide(keys: usize) -> Record {
    let root = Record::new();
    for i in 0..keys {
        root.insert(format!("k{i}"), record! { "v" => i as i64 });
    }
    root
}

// =============================================================================
// PATH BENCHMARKS
// =============================================================================

fn bench_resolve_read(c: &mut Criterion) {
    let root = chain();
    c.bench_function("resolve_read_depth_3", |b| {
        b.iter(|| black_box(resolve_read(&root, black_box("a.b.c"))))
    });
}

fn bench_resolve_write_same_value(c: &mut Criterion) {
    let root = chain();
    c.bench_function("resolve_write_same_value", |b| {
        b.iter(|| resolve_write(&root, "a.b.c", black_box(0)))
    });
}

// =============================================================================
// BINDING BENCHMARKS
// =============================================================================

fn bench_binding_create(c: &mut Criterion) {
    c.bench_function("binding_create", |b| {
        b.iter_batched(
            chain,
            |root| black_box(bind(&root, "a.b.c", |_| {})),
            BatchSize::SmallInput,
        )
    });
}

fn bench_write_notifies_binding(c: &mut Criterion) {
    // Fresh graph per batch: every evaluation adds registry entries.
    c.bench_function("write_notifies_binding", |b| {
        b.iter_batched(
            || {
                let root = chain();
                let binding = bind(&root, "a.b.c", |v| {
                    black_box(v);
                })
                .expect("bind a.b.c");
                (root, binding)
            },
            |(root, binding)| {
                for i in 1..=10 {
                    let _ = resolve_write(&root, "a.b.c", i);
                }
                black_box(binding.value())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    for count in [1usize, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let root = chain();
                    let bindings: Vec<_> = (0..count)
                        .filter_map(|_| bind(&root, "a.b.c", |_| {}).ok())
                        .collect();
                    (root, bindings)
                },
                |(root, bindings)| {
                    let _ = resolve_write(&root, "a.b.c", 1);
                    black_box(bindings.len())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

// =============================================================================
// INSTALL BENCHMARKS
// =============================================================================

fn bench_install(c: &mut Criterion) {
    let mut group = c.benchmark_group("install");
    for keys in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(keys), &keys, |b, &keys| {
            b.iter_batched(
                || wide(keys),
                |root| {
                    install(&root);
                    black_box(root)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_replace_sub_record(c: &mut Criterion) {
    c.bench_function("replace_sub_record", |b| {
        b.iter_batched(
            || {
                let root = chain();
                let replacement = Value::from(record! { "c" => 1 });
                (root, replacement)
            },
            |(root, replacement)| resolve_write(&root, "a.b", replacement),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    path_benches,
    bench_resolve_read,
    bench_resolve_write_same_value,
);

criterion_group!(
    binding_benches,
    bench_binding_create,
    bench_write_notifies_binding,
    bench_fan_out,
);

criterion_group!(install_benches, bench_install, bench_replace_sub_record);

criterion_main!(path_benches, binding_benches, install_benches);
