use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logkv::{Store, StoreConfig};
use std::fs::remove_dir_all;

fn setup_bench_dir(path: &str) {
    let _ = remove_dir_all(path);
    std::fs::create_dir_all(path).unwrap();
}

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_operations");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let test_dir = format!("bench_data/put_{}", size);
            setup_bench_dir(&test_dir);
            let store = Store::open(&test_dir, StoreConfig::default()).unwrap();

            b.iter(|| {
                for i in 0..size {
                    let key = format!("key_{}", i);
                    let value = format!("value_{}", i);
                    store.put(&key, value.as_bytes()).unwrap();
                }
            });

            let _ = remove_dir_all(&test_dir);
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let test_dir = "bench_data/get";
    setup_bench_dir(test_dir);
    let store = Store::open(test_dir, StoreConfig::default()).unwrap();

    for i in 0..1000 {
        let key = format!("key_{}", i);
        let value = format!("value_{}", i);
        store.put(&key, value.as_bytes()).unwrap();
    }

    c.bench_function("get_existing_key", |b| {
        b.iter(|| {
            let result = store.get(black_box("key_500")).unwrap();
            black_box(result);
        });
    });

    let _ = remove_dir_all(test_dir);
}

/// Background compaction isn't a directly callable operation, so this
/// benchmarks the rotation+compaction path indirectly: a small segment size
/// forces frequent rotations (and therefore merges) during the write loop
/// itself.
fn bench_put_with_rotation(c: &mut Criterion) {
    c.bench_function("put_1000_keys_with_rotation", |b| {
        b.iter_with_setup(
            || {
                let test_dir = "bench_data/rotation";
                setup_bench_dir(test_dir);
                let config = StoreConfig::default().with_segment_size(8192);
                Store::open(test_dir, config).unwrap()
            },
            |store| {
                for round in 0..5 {
                    for i in 0..1000 {
                        let key = format!("key_{}", i);
                        let value = format!("value_{}_{}", i, round);
                        store.put(&key, value.as_bytes()).unwrap();
                    }
                }
                store.close().unwrap();
            },
        );
    });
}

criterion_group!(benches, bench_put, bench_get, bench_put_with_rotation);
criterion_main!(benches);
