use boundkit::ds::{DaryHeapCore, PositionIndexedHeap};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const N: u64 = 10_000;

fn shuffled(seed: u64) -> Vec<u64> {
    let mut values: Vec<u64> = (0..N).collect();
    values.shuffle(&mut StdRng::seed_from_u64(seed));
    values
}

fn bench_add_then_pop(c: &mut Criterion) {
    let input = shuffled(7);
    let mut group = c.benchmark_group("dary_heap_add_pop");
    for factor in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(factor), &factor, |b, &factor| {
            b.iter_batched(
                || input.clone(),
                |values| {
                    let mut heap = DaryHeapCore::with_capacity(factor, values.len()).unwrap();
                    for v in values {
                        heap.add(v);
                    }
                    while let Some(v) = heap.pop() {
                        std::hint::black_box(v);
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_from_vec(c: &mut Criterion) {
    let input = shuffled(11);
    let mut group = c.benchmark_group("dary_heap_from_vec");
    for factor in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(factor), &factor, |b, &factor| {
            b.iter_batched(
                || input.clone(),
                |values| std::hint::black_box(DaryHeapCore::from_vec(factor, values).unwrap()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_update_priority(c: &mut Criterion) {
    let input = shuffled(13);
    c.bench_function("dary_heap_update_priority", |b| {
        b.iter_batched(
            || DaryHeapCore::from_vec(4, input.clone()).unwrap(),
            |mut heap| {
                for v in 0..N / 2 {
                    heap.update_priority(&std::hint::black_box(v), v + N);
                }
                heap
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_shared_peek(c: &mut Criterion) {
    let heap = PositionIndexedHeap::from_vec(4, shuffled(17)).unwrap();
    c.bench_function("shared_heap_peek_contains", |b| {
        b.iter(|| {
            for v in 0..1024u64 {
                std::hint::black_box(heap.peek());
                std::hint::black_box(heap.contains(&v));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_add_then_pop,
    bench_from_vec,
    bench_update_priority,
    bench_shared_peek
);
criterion_main!(benches);
