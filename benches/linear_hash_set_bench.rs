use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use linhash_set::{DefaultHashBuilder, LinearHashSet};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("linhash_set_insert_10k", |b| {
        b.iter_batched(
            LinearHashSet::<String>::new,
            |mut s| {
                for x in lcg(1).take(10_000) {
                    s.insert(key(x));
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_wide_buckets(c: &mut Criterion) {
    c.bench_function("linhash_set_insert_10k_n16", |b| {
        b.iter_batched(
            LinearHashSet::<u64, DefaultHashBuilder, 16>::default,
            |mut s| {
                for x in lcg(3).take(10_000) {
                    s.insert(x);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit(c: &mut Criterion) {
    c.bench_function("linhash_set_find_hit", |b| {
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        let s: LinearHashSet<String> = keys.iter().cloned().collect();
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(s.find(k.as_str()).unwrap());
        })
    });
}

fn bench_find_miss(c: &mut Criterion) {
    c.bench_function("linhash_set_find_miss", |b| {
        let s: LinearHashSet<String> = lcg(11).take(10_000).map(key).collect();
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // keys unlikely to be in the set
            let k = key(miss.next().unwrap());
            black_box(s.contains(&k));
        })
    });
}

fn bench_erase_reinsert(c: &mut Criterion) {
    c.bench_function("linhash_set_erase_reinsert", |b| {
        let mut s: LinearHashSet<u64> = lcg(13).take(10_000).collect();
        let keys: Vec<u64> = s.iter().copied().collect();
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let &k = it.next().unwrap();
            black_box(s.erase(&k));
            black_box(s.insert(k));
        })
    });
}

fn bench_iterate(c: &mut Criterion) {
    c.bench_function("linhash_set_iterate_10k", |b| {
        let s: LinearHashSet<u64> = lcg(17).take(10_000).collect();
        b.iter(|| black_box(s.iter().fold(0u64, |acc, k| acc ^ k)))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_insert_wide_buckets, bench_find_hit, bench_find_miss,
        bench_erase_reinsert, bench_iterate
}
criterion_main!(benches);
