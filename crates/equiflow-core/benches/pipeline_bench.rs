// ─────────────────────────────────────────────────────────────────────
// Equiflow — Pipeline Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the stability certifier and the full
//! sample → solve → certify → deliver control cycle.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use equiflow_core::{Coordinator, ExternalSink, StaticDemand};
use equiflow_stability::StabilityCertifier;
use equiflow_types::EquiflowConfig;

const N: usize = 64;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_rates(n: usize) -> Vec<f64> {
    (0..n).map(|i| 5.0 + (i as f64 * 0.7).sin() * 4.0).collect()
}

fn make_services(n: usize) -> Vec<f64> {
    make_rates(n).iter().map(|l| l * 1.5 + 1.0).collect()
}

fn make_priorities(n: usize) -> Vec<f64> {
    (0..n).map(|i| 1.0 + (i % 4) as f64).collect()
}

fn make_coordinator(n: usize) -> Coordinator {
    let rates = make_rates(n);
    let priorities = make_priorities(n);
    let cfg = EquiflowConfig {
        total_resources: 2.0 * rates.iter().map(|l| l / 0.1).sum::<f64>(),
        ..EquiflowConfig::default()
    };
    let source = Arc::new(StaticDemand::from_rates(&rates, &priorities).unwrap());
    let sink = Arc::new(ExternalSink::new(|_| Ok(())));
    Coordinator::new(cfg, source, sink).unwrap()
}

// ── Certifier benchmarks ─────────────────────────────────────────────

fn bench_certifier_check_4(c: &mut Criterion) {
    let mut certifier = StabilityCertifier::new(0.1, 1e-5, 42);
    let rates = [10.0, 20.0, 30.0, 40.0];
    let services = [100.0, 200.0, 300.0, 400.0];

    c.bench_function("certifier_check_4", |b| {
        b.iter(|| certifier.check(black_box(&rates), black_box(&services)))
    });
}

fn bench_certifier_check_64(c: &mut Criterion) {
    let mut certifier = StabilityCertifier::new(0.1, 1e-5, 42);
    let rates = make_rates(N);
    let services = make_services(N);

    c.bench_function("certifier_check_64", |b| {
        b.iter(|| certifier.check(black_box(&rates), black_box(&services)))
    });
}

fn bench_certifier_analyze_64(c: &mut Criterion) {
    let mut certifier = StabilityCertifier::new(0.1, 1e-5, 42);
    let rates = make_rates(N);
    let allocations: Vec<f64> = rates.iter().map(|l| l / 0.1 * 2.0).collect();

    c.bench_function("certifier_analyze_64", |b| {
        b.iter(|| certifier.analyze(black_box(&rates), black_box(&allocations)))
    });
}

// ── Cycle benchmarks ─────────────────────────────────────────────────

fn bench_coordinator_init(c: &mut Criterion) {
    c.bench_function("coordinator_init_64", |b| b.iter(|| make_coordinator(N)));
}

fn bench_run_cycle_4(c: &mut Criterion) {
    let coordinator = make_coordinator(4);
    c.bench_function("run_cycle_4", |b| b.iter(|| coordinator.run_cycle()));
}

fn bench_run_cycle_64(c: &mut Criterion) {
    let coordinator = make_coordinator(N);
    c.bench_function("run_cycle_64", |b| b.iter(|| coordinator.run_cycle()));
}

// ── Groups ───────────────────────────────────────────────────────────

criterion_group!(
    certifier,
    bench_certifier_check_4,
    bench_certifier_check_64,
    bench_certifier_analyze_64,
);

criterion_group!(
    cycle,
    bench_coordinator_init,
    bench_run_cycle_4,
    bench_run_cycle_64,
);

criterion_main!(certifier, cycle);
