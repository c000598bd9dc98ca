use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use probe_table::{postal, PostalRange, Strategy, TableConfig};
use std::time::Duration;

const RANGES: usize = 5_500;
const LOAD_FACTORS: [f64; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.99];

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

// Non-overlapping five-digit ranges in shuffled order, roughly the size of a
// national postal-range dataset.
fn ranges(n: usize) -> Vec<PostalRange> {
    let width = 100_000 / n as u64;
    let mut starts: Vec<u64> = (0..n as u64).map(|i| i * width).collect();
    for (i, x) in lcg(42).take(n).enumerate() {
        let j = (x as usize) % n;
        starts.swap(i, j);
    }
    starts
        .into_iter()
        .map(|s| {
            PostalRange::new(
                "SP",
                format!("city{s}"),
                format!("{s:05}"),
                format!("{:05}", s + width - 1),
            )
        })
        .collect()
}

fn strategy_name(s: Strategy) -> &'static str {
    match s {
        Strategy::DoubleHashing => "double",
        Strategy::LinearProbing => "linear",
    }
}

fn bench_insert(c: &mut Criterion) {
    let data = ranges(RANGES);
    let mut g = c.benchmark_group("insert_all");
    for buckets in [1_000usize, 6_100] {
        for strategy in [Strategy::DoubleHashing, Strategy::LinearProbing] {
            let id = BenchmarkId::new(strategy_name(strategy), buckets);
            g.bench_with_input(id, &buckets, |b, &buckets| {
                b.iter_batched(
                    || data.clone(),
                    |rows| {
                        let config = TableConfig::new(buckets, strategy, 0.7);
                        let mut t = postal::new_table(config).unwrap();
                        for r in rows {
                            let _ = t.insert(r);
                        }
                        black_box(t)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    g.finish();
}

fn bench_lookup_by_occupancy(c: &mut Criterion) {
    let data = ranges(RANGES);
    let mut s = 0x9e3779b97f4a7c15u64;
    let queries: Vec<String> = (0..10_000)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            data[(s as usize) % data.len()].start.clone()
        })
        .collect();

    let mut g = c.benchmark_group("lookup_hit_10k");
    for strategy in [Strategy::DoubleHashing, Strategy::LinearProbing] {
        for lf in LOAD_FACTORS {
            let config = TableConfig::new(6_100, strategy, lf);
            let mut t = postal::new_table(config).unwrap();
            for r in data.iter().cloned() {
                let _ = t.insert(r);
            }
            let id = BenchmarkId::new(strategy_name(strategy), lf);
            g.bench_function(id, |b| {
                b.iter(|| {
                    for q in &queries {
                        black_box(t.lookup(q));
                    }
                })
            });
        }
    }
    g.finish();
}

fn bench_lookup_miss(c: &mut Criterion) {
    let data = ranges(RANGES);
    let mut g = c.benchmark_group("lookup_miss_10k");
    for strategy in [Strategy::DoubleHashing, Strategy::LinearProbing] {
        let mut t = postal::new_table(TableConfig::new(6_100, strategy, 0.7)).unwrap();
        for r in data.iter().cloned() {
            let _ = t.insert(r);
        }
        let mut miss = lcg(0xdead_beef);
        g.bench_function(strategy_name(strategy), |b| {
            b.iter(|| {
                for _ in 0..10_000 {
                    let k = format!("x{:05}", miss.next().unwrap() % 100_000);
                    black_box(t.lookup(&k));
                }
            })
        });
    }
    g.finish();
}

fn bench_delete_reinsert(c: &mut Criterion) {
    c.bench_function("delete_reinsert_1k_of_5500", |b| {
        let data = ranges(RANGES);
        b.iter_batched(
            || {
                let mut t = postal::new_table(TableConfig::new(6_100, Strategy::DoubleHashing, 0.7))
                    .unwrap();
                for r in data.iter().cloned() {
                    let _ = t.insert(r);
                }
                t
            },
            |mut t| {
                for r in data.iter().take(1_000) {
                    if let Some(taken) = t.remove(&r.start) {
                        let _ = t.insert(taken);
                    }
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_range_scan(c: &mut Criterion) {
    let data = ranges(RANGES);
    let mut t = postal::new_table(TableConfig::new(6_100, Strategy::DoubleHashing, 0.7)).unwrap();
    for r in data.iter().cloned() {
        let _ = t.insert(r);
    }
    c.bench_function("find_containing_100", |b| {
        b.iter(|| {
            for code in (0..100_000).step_by(1_000) {
                black_box(t.find_containing(&format!("{code:05}")));
            }
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert, bench_delete_reinsert
}
criterion_group! {
    name = benches_query;
    config = bench_config();
    targets = bench_lookup_by_occupancy, bench_lookup_miss, bench_range_scan
}
criterion_main!(benches_insert, benches_query);
