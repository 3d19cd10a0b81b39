use boundkit::policy::lfu::{BoundedLfuCache, LfuCore};
use boundkit::traits::{CoreCache, LfuCacheTrait};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn filled_core(capacity: u64) -> LfuCore<u64, u64> {
    let mut cache = LfuCore::new(capacity as usize).unwrap();
    for i in 0..capacity {
        cache.insert(i, i);
    }
    cache
}

fn bench_lfu_get_bumps(c: &mut Criterion) {
    c.bench_function("lfu_get_bumps", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..1024u64 {
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i % 64)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lfu_eviction_churn(c: &mut Criterion) {
    c.bench_function("lfu_eviction_churn", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.insert(std::hint::black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lfu_pop_lfu(c: &mut Criterion) {
    c.bench_function("lfu_pop_lfu", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for _ in 0..1024u64 {
                    let _ = std::hint::black_box(cache.pop_lfu());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_shared_lfu_skewed_mix(c: &mut Criterion) {
    let cache = BoundedLfuCache::new(512).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let keys: Vec<u64> = (0..8192)
        .map(|_| rng.gen_range(0..32u64) * rng.gen_range(1..64u64))
        .collect();

    c.bench_function("shared_lfu_skewed_mix", |b| {
        b.iter(|| {
            for (n, key) in keys.iter().enumerate() {
                if n % 4 == 0 {
                    cache.set(*key, n as u64);
                } else {
                    let _ = std::hint::black_box(cache.get(key));
                }
            }
        })
    });
}

criterion_group!(
    benches,
    bench_lfu_get_bumps,
    bench_lfu_eviction_churn,
    bench_lfu_pop_lfu,
    bench_shared_lfu_skewed_mix
);
criterion_main!(benches);
