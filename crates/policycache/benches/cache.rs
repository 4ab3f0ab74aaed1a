use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use policycache::{Cache, MaxCount};

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit", |b| {
        let mut cache = Cache::new().with_policy(MaxCount::new(1000));

        // Pre-populate so every lookup hits
        for i in 0..1000u64 {
            cache.add(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 1000)));
            counter += 1;
        });
    });

    group.bench_function("get_miss", |b| {
        let mut cache = Cache::new().with_policy(MaxCount::new(1000));

        for i in 0..1000u64 {
            cache.add(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(1000 + counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_add_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("add_evicting", |b| {
        // Every add past the cap evicts the oldest entry
        let mut cache = Cache::new().with_policy(MaxCount::new(100));

        let mut counter = 0u64;
        b.iter(|| {
            cache.add(black_box(counter), counter);
            counter += 1;
        });
    });

    group.bench_function("add_update", |b| {
        let mut cache = Cache::new().with_policy(MaxCount::new(100));

        let mut counter = 0u64;
        b.iter(|| {
            cache.add(black_box(counter % 100), counter);
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_get_50_add", |b| {
        let mut cache = Cache::new().with_policy(MaxCount::new(1000));

        for i in 0..1000u64 {
            cache.add(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter % 2 == 0 {
                black_box(cache.get(&(counter % 1000)));
            } else {
                cache.add(counter, counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_add_churn, bench_mixed_50_50);
criterion_main!(benches);
