use criterion::{black_box, criterion_group, criterion_main, Criterion};
use runtime::{engine::SimEngine, metrics::TickLatencyMetrics};
use std::time::Instant;
use tokio::runtime::Builder;

const LATENCY_SAMPLES: usize = 5_000;
const TICK_BUDGET_MICROS: u64 = 2_000_000;

fn bench_tick_latency(c: &mut Criterion) {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime should build");

    let mut metrics = TickLatencyMetrics::with_window(LATENCY_SAMPLES);
    runtime.block_on(async {
        let engine = SimEngine::for_test_seed(11).expect("default catalog should load");
        for sample in 0..LATENCY_SAMPLES {
            let started = Instant::now();
            let report = engine.step_at(sample as u64 * 2_000).await;
            metrics.record_latency_micros(started.elapsed().as_micros() as u64);
            black_box(report);
        }
    });

    if let Some(report) = metrics.percentiles() {
        println!(
            "tick_budget_micros={TICK_BUDGET_MICROS} p50_micros={} p95_micros={} p99_micros={} max_micros={} samples={}",
            report.p50_micros, report.p95_micros, report.p99_micros, report.max_micros, report.count
        );
    }

    c.bench_function("runtime_latency_step_at", |b| {
        let engine = SimEngine::for_test_seed(13).expect("default catalog should load");
        let mut now_ms = 0;
        b.iter(|| {
            now_ms += 2_000;
            runtime.block_on(async {
                black_box(engine.step_at(now_ms).await);
            });
        });
    });
}

criterion_group!(benches, bench_tick_latency);
criterion_main!(benches);
