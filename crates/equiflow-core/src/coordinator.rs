// ─────────────────────────────────────────────────────────────────────
// Equiflow — Control-Loop Coordinator
// ─────────────────────────────────────────────────────────────────────
//! Periodic control cycle tying the three planes together:
//!
//!   demand source → allocator → stability certifier → sink
//!
//! Each cycle samples the fleet, solves for the capacity split,
//! certifies the resulting traffic intensities, and pushes the plan
//! southbound. A failure at any step aborts the cycle: nothing is
//! delivered and the error propagates to the caller unchanged.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use equiflow_allocator::{AllocationEngine, AllocationOutcome};
use equiflow_stability::{StabilityCertifier, StabilityReport};
use equiflow_types::{EquiflowConfig, EquiflowResult};

use crate::demand::DemandSource;
use crate::sink::AllocationSink;

/// Outcome of one completed control cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: usize,
    /// Delivered per-node capacity plan.
    pub allocations: Vec<f64>,
    /// Objective value at the delivered plan.
    pub objective: f64,
    /// Solver iterations consumed.
    pub iterations: usize,
    /// Stability certificate for the delivered plan.
    pub stability: StabilityReport,
}

/// Control-loop coordinator.
///
/// Thread-safe: the allocator and certifier step internal scratch
/// state, so each sits behind a `parking_lot::Mutex`; the counters are
/// atomic. `run_cycle(&self)` may be driven from multiple threads.
pub struct Coordinator {
    cfg: EquiflowConfig,
    source: Arc<dyn DemandSource>,
    sink: Arc<dyn AllocationSink>,
    engine: Mutex<AllocationEngine>,
    certifier: Mutex<StabilityCertifier>,
    history: Mutex<VecDeque<CycleReport>>,
    cycles: AtomicUsize,
    failures: AtomicUsize,
}

impl Coordinator {
    /// Wire up a control loop, validating the configuration up front.
    pub fn new(
        cfg: EquiflowConfig,
        source: Arc<dyn DemandSource>,
        sink: Arc<dyn AllocationSink>,
    ) -> EquiflowResult<Self> {
        let engine = AllocationEngine::new(cfg.clone())?;
        let certifier = StabilityCertifier::from_config(&cfg);
        Ok(Self {
            cfg,
            source,
            sink,
            engine: Mutex::new(engine),
            certifier: Mutex::new(certifier),
            history: Mutex::new(VecDeque::new()),
            cycles: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        })
    }

    // ------------------------------------------------------------------
    // Cycle driving
    // ------------------------------------------------------------------

    /// Run one control cycle: sample, solve, certify, deliver.
    ///
    /// On success the report joins the bounded history and the cycle
    /// counter advances. On failure only the failure counter moves and
    /// the error is returned unchanged.
    pub fn run_cycle(&self) -> EquiflowResult<CycleReport> {
        match self.try_cycle() {
            Ok((outcome, stability)) => {
                let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
                let report = CycleReport {
                    cycle,
                    allocations: outcome.allocations,
                    objective: outcome.objective,
                    iterations: outcome.iterations,
                    stability,
                };
                log::info!(
                    "cycle {cycle}: delivered {} node shares, objective {:.4}, stable={}",
                    report.allocations.len(),
                    report.objective,
                    report.stability.stable
                );
                let mut history = self.history.lock();
                history.push_back(report.clone());
                if history.len() > self.cfg.history_window {
                    history.pop_front();
                }
                Ok(report)
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                log::error!("control cycle aborted: {e}");
                Err(e)
            }
        }
    }

    /// Drive `n` consecutive cycles, stopping at the first failure.
    pub fn run(&self, n: usize) -> EquiflowResult<Vec<CycleReport>> {
        let mut reports = Vec::with_capacity(n);
        for _ in 0..n {
            reports.push(self.run_cycle()?);
        }
        Ok(reports)
    }

    fn try_cycle(&self) -> EquiflowResult<(AllocationOutcome, StabilityReport)> {
        let snapshot = self.source.sample()?;
        snapshot.validate()?;
        let rates = snapshot.arrival_rates();
        let priorities = snapshot.priority_levels();

        let outcome = self.engine.lock().allocate(&rates, &priorities, None)?;
        let stability = self.certifier.lock().analyze(&rates, &outcome.allocations)?;
        self.sink.deliver(&outcome.allocations)?;
        Ok((outcome, stability))
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    /// Completed cycles since construction.
    pub fn cycle_count(&self) -> usize {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Failed cycles since construction.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// Reports currently retained in the bounded history, oldest first.
    pub fn recent_reports(&self) -> Vec<CycleReport> {
        self.history.lock().iter().cloned().collect()
    }

    /// Share of retained reports whose verdict was unstable.
    ///
    /// Coarse fleet health signal; 0.0 with an empty history.
    pub fn unstable_fraction(&self) -> f64 {
        let history = self.history.lock();
        if history.is_empty() {
            return 0.0;
        }
        let unstable = history.iter().filter(|r| !r.stability.stable).count();
        unstable as f64 / history.len() as f64
    }

    /// Read-only access to the shared configuration.
    pub fn config(&self) -> &EquiflowConfig {
        &self.cfg
    }
}
