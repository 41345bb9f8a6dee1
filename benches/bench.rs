// Criterion benchmarks for Pairing Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pairing_algo::core::{is_stable, StableMatcher, WeightedBiddingMatcher};
use pairing_algo::models::BiddingParams;
use pairing_algo::toolkit::{
    bucket_sort, first_faulty_binary, first_faulty_linear, interpolation_search,
    mark_faulty_from, non_uniform_stations, random_bidding_dataset, random_preference_table,
    sequential_stations,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn bench_stable_matching(c: &mut Criterion) {
    let matcher = StableMatcher::new();
    let mut group = c.benchmark_group("stable_matching");

    for size in [5usize, 20, 50, 100].iter() {
        let mut rng = ChaCha8Rng::seed_from_u64(*size as u64);
        let table = random_preference_table(*size, *size, &mut rng)
            .expect("generated tables are complete");

        group.bench_with_input(BenchmarkId::new("deferred_acceptance", size), size, |b, _| {
            b.iter(|| matcher.run(black_box(&table)));
        });
    }

    group.finish();
}

fn bench_stability_check(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let table = random_preference_table(50, 50, &mut rng).expect("generated tables are complete");
    let result = StableMatcher::new()
        .run(&table)
        .expect("matching a complete table succeeds");

    c.bench_function("stability_check_50", |b| {
        b.iter(|| is_stable(black_box(&result), black_box(&table)));
    });
}

fn bench_bidding(c: &mut Criterion) {
    let matcher = WeightedBiddingMatcher::new(BiddingParams::default());
    let mut group = c.benchmark_group("weighted_bidding");

    for size in [5usize, 20, 50].iter() {
        let mut rng = ChaCha8Rng::seed_from_u64(*size as u64);
        let market = random_bidding_dataset(*size, *size, &mut rng)
            .to_market()
            .expect("generated markets are complete");

        group.bench_with_input(BenchmarkId::new("greedy_auction", size), size, |b, _| {
            b.iter(|| {
                matcher.run(
                    black_box(&market.weights),
                    black_box(&market.budgets),
                    black_box(&market.capacities),
                )
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let uniform = sequential_stations(10_000);
    let skewed = non_uniform_stations(10_000, &mut rng);
    let target = skewed[6_789].id;

    c.bench_function("interpolation_uniform_10k", |b| {
        b.iter(|| interpolation_search(black_box(&uniform), black_box(6_790)));
    });
    c.bench_function("interpolation_non_uniform_10k", |b| {
        b.iter(|| interpolation_search(black_box(&skewed), black_box(target)));
    });

    let mut line = sequential_stations(10_000);
    mark_faulty_from(&mut line, 7_500);

    let mut group = c.benchmark_group("first_faulty");
    group.bench_function("binary", |b| {
        b.iter(|| first_faulty_binary(black_box(&line), |s| s.faulty));
    });
    group.bench_function("linear", |b| {
        b.iter(|| first_faulty_linear(black_box(&line), |s| s.faulty));
    });
    group.finish();
}

fn bench_bucket_sort(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let values: Vec<i32> = (0..10_000).map(|_| rng.gen_range(-50_000..50_000)).collect();

    c.bench_function("bucket_sort_10k", |b| {
        b.iter(|| {
            let mut data = values.clone();
            bucket_sort(black_box(&mut data));
            data
        });
    });
}

criterion_group!(
    benches,
    bench_stable_matching,
    bench_stability_check,
    bench_bidding,
    bench_search,
    bench_bucket_sort
);

criterion_main!(benches);
