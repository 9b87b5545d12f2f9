//! Pool executor throughput: scheduling overhead for batches of
//! zero-duration tasks under different limits.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use tasklane_core::{run_pool, RunOptions, Task, TaskFn};

fn batch(count: usize) -> Vec<Arc<dyn Task>> {
    (0..count)
        .map(|_| TaskFn::arc(|| async { Ok(json!(null)) }))
        .collect()
}

fn bench_pool_scheduling(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime");
    let options = RunOptions::default();

    let mut group = c.benchmark_group("pool_scheduling");
    for limit in [1usize, 4, 16, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(limit),
            &limit,
            |b, &limit| {
                b.iter(|| {
                    let summary = rt
                        .block_on(run_pool(batch(256), limit, &options))
                        .expect("run");
                    black_box(summary.succeeded)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pool_scheduling);
criterion_main!(benches);
