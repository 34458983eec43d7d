//! Hot-path benchmarks for the synchronous pacing primitives

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pacing::{Memo, Previous, StableCallback, Throttler};
use std::time::Duration;

fn bench_throttle(c: &mut Criterion) {
    let throttler = Throttler::new(Duration::from_secs(3600), |n: u64| n * 2);
    throttler.call(0);

    c.bench_function("throttle_dropped_call", |b| {
        b.iter(|| black_box(throttler.call(black_box(1))));
    });

    let open = Throttler::new(Duration::ZERO, |n: u64| n * 2);
    c.bench_function("throttle_executed_call", |b| {
        b.iter(|| black_box(open.call(black_box(1))));
    });
}

fn bench_stable_dispatch(c: &mut Criterion) {
    let callback = StableCallback::new(|n: u64| n + 1);
    let handle = callback.handle();

    c.bench_function("stable_handle_call", |b| {
        b.iter(|| black_box(handle.call(black_box(41))));
    });

    c.bench_function("stable_wrap", |b| {
        b.iter(|| black_box(callback.wrap(|n: u64| n + 1)));
    });
}

fn bench_memo(c: &mut Criterion) {
    let deps: Vec<u64> = (0..16).collect();
    let mut memo = Memo::new();
    memo.get(deps.clone(), || deps.iter().sum::<u64>());

    c.bench_function("memo_hit_16_deps", |b| {
        b.iter(|| *memo.get(black_box(deps.clone()), || unreachable!()));
    });

    let mut previous = Previous::new();
    c.bench_function("previous_track", |b| {
        b.iter(|| black_box(previous.track(black_box(7u64))));
    });
}

criterion_group!(benches, bench_throttle, bench_stable_dispatch, bench_memo);
criterion_main!(benches);
