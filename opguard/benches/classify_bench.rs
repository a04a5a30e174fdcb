//! Benchmarks for failure classification.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opguard::classify::classify_message;

fn classify_benchmark(c: &mut Criterion) {
    c.bench_function("classify_retryable", |b| {
        b.iter(|| classify_message(black_box("fetch failed: connection reset by peer")))
    });

    c.bench_function("classify_unique_violation", |b| {
        b.iter(|| {
            classify_message(black_box(
                "duplicate key value violates unique constraint \"friendships_pkey\"",
            ))
        })
    });
}

criterion_group!(benches, classify_benchmark);
criterion_main!(benches);
