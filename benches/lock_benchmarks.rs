use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rs_lockmgr::{ExclusiveLockManager, LockManager, SharedLockManager};
use std::collections::VecDeque;

type Shared = SharedLockManager<u64, u64, VecDeque<u64>>;

fn bench_uncontended(c: &mut Criterion) {
    c.bench_function("uncontended_write_release_1000_keys", |b| {
        b.iter(|| {
            let mut lm: Shared = SharedLockManager::new(VecDeque::new());
            for key in 0..1000u64 {
                lm.write_lock(key, key);
            }
            for key in 0..1000u64 {
                lm.release(key, black_box(&key)).unwrap();
            }
            lm
        });
    });
}

fn bench_exclusive_chain(c: &mut Criterion) {
    c.bench_function("exclusive_fifo_chain_1000_txns", |b| {
        b.iter(|| {
            let mut lm: ExclusiveLockManager<u64, u64, VecDeque<u64>> =
                ExclusiveLockManager::new(VecDeque::new());
            for txn in 0..1000u64 {
                lm.write_lock(txn, 0);
            }
            for txn in 0..1000u64 {
                lm.release(txn, &0).unwrap();
            }
            black_box(lm.ready().len())
        });
    });
}

fn bench_shared_cascade(c: &mut Criterion) {
    c.bench_function("shared_run_cascade_100_readers", |b| {
        b.iter(|| {
            let mut lm: Shared = SharedLockManager::new(VecDeque::new());
            lm.write_lock(0, 0);
            for txn in 1..=100u64 {
                lm.read_lock(txn, 0);
            }
            lm.release(0, &0).unwrap();
            black_box(lm.ready().len())
        });
    });
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_exclusive_chain,
    bench_shared_cascade
);
criterion_main!(benches);
