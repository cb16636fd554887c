//! Put / get throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use caskdb_core::{Database, Options};

fn bench_put(c: &mut Criterion) {
    let dir = TempDir::new().expect("temp dir");
    let db = Database::open(Options {
        dir_path: dir.path().to_path_buf(),
        ..Options::default()
    })
    .expect("open");

    let mut n = 0u64;
    c.bench_function("put", |b| {
        b.iter(|| {
            n += 1;
            let key = n.to_be_bytes();
            db.put(black_box(&key), b"benchmark-value").expect("put");
        });
    });
}

fn bench_get(c: &mut Criterion) {
    let dir = TempDir::new().expect("temp dir");
    let db = Database::open(Options {
        dir_path: dir.path().to_path_buf(),
        ..Options::default()
    })
    .expect("open");

    for n in 0..1000u64 {
        db.put(&n.to_be_bytes(), b"benchmark-value").expect("put");
    }

    let mut n = 0u64;
    c.bench_function("get", |b| {
        b.iter(|| {
            n = (n + 1) % 1000;
            let key = n.to_be_bytes();
            black_box(db.get(black_box(&key)).expect("get"));
        });
    });
}

criterion_group!(benches, bench_put, bench_get);
criterion_main!(benches);
