// ─────────────────────────────────────────────────────────────────────
// Equiflow — Allocator Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the capacity allocation engine.
//!
//! Covers every hot-path component:
//!   - Cost terms (objective, analytic gradient, finite differences)
//!   - Feasible-set projection
//!   - Full solves, cold and warm-started, at fleet sizes 4 and 64

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use equiflow_allocator::engine::AllocationEngine;
use equiflow_allocator::objective::{gradient_fd, objective, objective_gradient};
use equiflow_allocator::projection::{project_onto_pool, stability_floors};
use equiflow_types::EquiflowConfig;

const N: usize = 64;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_rates(n: usize) -> Vec<f64> {
    (0..n).map(|i| 5.0 + (i as f64 * 0.7).sin() * 4.0).collect()
}

fn make_priorities(n: usize) -> Vec<f64> {
    (0..n).map(|i| 1.0 + (i % 4) as f64).collect()
}

fn pool_for(n: usize) -> f64 {
    // Twice the stability-floor mass keeps the optimum interior.
    2.0 * make_rates(n).iter().map(|l| l / 0.1).sum::<f64>()
}

fn make_engine(n: usize) -> AllocationEngine {
    let cfg = EquiflowConfig {
        total_resources: pool_for(n),
        ..EquiflowConfig::default()
    };
    AllocationEngine::new(cfg).unwrap()
}

// ── Cost-term benchmarks ─────────────────────────────────────────────

fn bench_objective(c: &mut Criterion) {
    let rates = make_rates(N);
    let priorities = make_priorities(N);
    let pool = pool_for(N);
    let allocations = vec![pool / N as f64; N];

    c.bench_function("objective_64", |b| {
        b.iter(|| {
            objective(
                black_box(&rates),
                black_box(&priorities),
                black_box(&allocations),
                pool,
                0.1,
                0.1,
                0.1,
            )
        })
    });
}

fn bench_gradient_analytic(c: &mut Criterion) {
    let rates = make_rates(N);
    let pool = pool_for(N);
    let allocations = vec![pool / N as f64; N];
    let mut grad = vec![0.0; N];

    c.bench_function("gradient_analytic_64", |b| {
        b.iter(|| {
            objective_gradient(
                black_box(&rates),
                black_box(&allocations),
                0.1,
                0.1,
                &mut grad,
            )
        })
    });
}

fn bench_gradient_fd(c: &mut Criterion) {
    let rates = make_rates(N);
    let priorities = make_priorities(N);
    let pool = pool_for(N);
    let allocations = vec![pool / N as f64; N];

    c.bench_function("gradient_fd_64", |b| {
        b.iter(|| {
            gradient_fd(black_box(&allocations), 1e-5, |r| {
                objective(&rates, &priorities, r, pool, 0.1, 0.1, 0.1)
            })
        })
    });
}

// ── Projection benchmarks ────────────────────────────────────────────

fn bench_stability_floors(c: &mut Criterion) {
    let rates = make_rates(N);
    c.bench_function("stability_floors_64", |b| {
        b.iter(|| stability_floors(black_box(&rates), 0.1, 1e-6))
    });
}

fn bench_projection(c: &mut Criterion) {
    let rates = make_rates(N);
    let pool = pool_for(N);
    let floors = stability_floors(&rates, 0.1, 1e-6);
    let point: Vec<f64> = (0..N)
        .map(|i| (i as f64 * 0.31).cos().abs() * pool / 8.0)
        .collect();
    let mut out = vec![0.0; N];
    let mut scratch = Vec::with_capacity(N);

    c.bench_function("projection_64", |b| {
        b.iter(|| {
            project_onto_pool(
                black_box(&point),
                black_box(&floors),
                pool,
                &mut out,
                &mut scratch,
            )
        })
    });
}

// ── Engine benchmarks ────────────────────────────────────────────────

fn bench_engine_init(c: &mut Criterion) {
    c.bench_function("engine_init", |b| {
        b.iter(|| AllocationEngine::new(black_box(EquiflowConfig::default())))
    });
}

fn bench_allocate_4_saturated(c: &mut Criterion) {
    // Floors consume the whole default pool: the solve lands on them
    // in a single iteration.
    let mut engine = AllocationEngine::default_params();
    let rates = [10.0, 20.0, 30.0, 40.0];
    let priorities = [1.0, 2.0, 3.0, 4.0];

    c.bench_function("allocate_4_saturated", |b| {
        b.iter(|| engine.allocate(black_box(&rates), black_box(&priorities), None))
    });
}

fn bench_allocate_4_relaxed(c: &mut Criterion) {
    let cfg = EquiflowConfig {
        total_resources: 2000.0,
        ..EquiflowConfig::default()
    };
    let mut engine = AllocationEngine::new(cfg).unwrap();
    let rates = [10.0, 20.0, 30.0, 40.0];
    let priorities = [1.0, 2.0, 3.0, 4.0];

    c.bench_function("allocate_4_relaxed", |b| {
        b.iter(|| engine.allocate(black_box(&rates), black_box(&priorities), None))
    });
}

fn bench_allocate_64(c: &mut Criterion) {
    let mut engine = make_engine(N);
    let rates = make_rates(N);
    let priorities = make_priorities(N);

    c.bench_function("allocate_64", |b| {
        b.iter(|| engine.allocate(black_box(&rates), black_box(&priorities), None))
    });
}

fn bench_allocate_64_warm(c: &mut Criterion) {
    let mut engine = make_engine(N);
    let rates = make_rates(N);
    let priorities = make_priorities(N);
    let warm = engine.allocate(&rates, &priorities, None).unwrap().allocations;

    c.bench_function("allocate_64_warm_start", |b| {
        b.iter(|| {
            engine.allocate(
                black_box(&rates),
                black_box(&priorities),
                Some(black_box(&warm)),
            )
        })
    });
}

// ── Groups ───────────────────────────────────────────────────────────

criterion_group!(
    costs,
    bench_objective,
    bench_gradient_analytic,
    bench_gradient_fd,
);

criterion_group!(projection, bench_stability_floors, bench_projection,);

criterion_group!(
    engine,
    bench_engine_init,
    bench_allocate_4_saturated,
    bench_allocate_4_relaxed,
    bench_allocate_64,
    bench_allocate_64_warm,
);

criterion_main!(costs, projection, engine);
