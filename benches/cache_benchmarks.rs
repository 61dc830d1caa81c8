use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use private_markets::cache::TtlCache;
use private_markets::resilience::RetryPolicy;
use std::time::Duration;

fn benchmark_cache_hit(c: &mut Criterion) {
    let cache = TtlCache::new(Duration::from_secs(3600), 1000, true);
    for i in 0..1000 {
        cache.set(&format!("funds:{i}"), i);
    }

    c.bench_function("cache_get_hit", |b| {
        b.iter(|| cache.get(black_box("funds:500")))
    });
}

fn benchmark_cache_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_set_with_eviction");
    for max_size in [100usize, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(max_size), &max_size, |b, &max_size| {
            let cache = TtlCache::new(Duration::from_secs(3600), max_size, true);
            let mut i = 0u64;
            b.iter(|| {
                cache.set(&format!("investors:{i}"), i);
                i += 1;
            })
        });
    }
    group.finish();
}

fn benchmark_prefix_invalidation(c: &mut Criterion) {
    c.bench_function("cache_invalidate_prefix", |b| {
        b.iter_batched(
            || {
                let cache = TtlCache::new(Duration::from_secs(3600), 3000, true);
                for i in 0..1000 {
                    cache.set(&format!("funds:{i}"), i);
                    cache.set(&format!("investors:{i}"), i);
                    cache.set(&format!("investments:{i}"), i);
                }
                cache
            },
            |cache| cache.invalidate(black_box(&["funds:"])),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn benchmark_backoff_delay(c: &mut Criterion) {
    let policy = RetryPolicy::default();
    c.bench_function("retry_delay_for_attempt", |b| {
        b.iter(|| policy.delay_for_attempt(black_box(4)))
    });
}

criterion_group!(
    benches,
    benchmark_cache_hit,
    benchmark_cache_eviction,
    benchmark_prefix_invalidation,
    benchmark_backoff_delay
);
criterion_main!(benches);
