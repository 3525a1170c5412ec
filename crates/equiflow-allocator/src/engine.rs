// ─────────────────────────────────────────────────────────────────────
// Equiflow — Allocation Engine
// ─────────────────────────────────────────────────────────────────────
//! Projected gradient descent over the allocation polytope:
//!
//!   minimise  f(R) = Σ_i λ_i (1/(α R_i) + β P_i) + Σ_i γ (R_total - R_i)
//!   subject to  Σ_i R_i = R_total,  R_i ≥ max(λ_i/α, floor)
//!
//! Every iterate stays feasible: gradient step, then exact projection
//! back onto the pool. The step size warm-starts from the previous
//! iteration, doubling while the objective keeps improving and
//! backtracking while it does not.

use serde::{Deserialize, Serialize};

use equiflow_types::{EquiflowConfig, EquiflowError, EquiflowResult};

use crate::objective::{objective, objective_gradient};
use crate::projection::{project_onto_pool, stability_floors};

/// Slack allowed when testing Σ floors against the pool.
const FEASIBILITY_TOL: f64 = 1e-9;

/// Smallest line-search step before the search is declared exhausted.
const STEP_FLOOR: f64 = 1e-16;

/// Result of one allocation solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// Optimal per-node capacity shares R_i.
    pub allocations: Vec<f64>,
    /// Objective value at the returned point.
    pub objective: f64,
    /// Iterations consumed by the solver.
    pub iterations: usize,
    /// Human-readable solver diagnostic.
    pub message: String,
}

/// Capacity allocation engine.
///
/// Owns its scratch buffers, so repeated solves on a long-lived engine
/// do not reallocate per cycle.
pub struct AllocationEngine {
    pub cfg: EquiflowConfig,
    // Scratch reused across solves
    floors: Vec<f64>,
    current: Vec<f64>,
    stage: Vec<f64>,
    trial: Vec<f64>,
    best: Vec<f64>,
    gradient: Vec<f64>,
    proj_scratch: Vec<f64>,
}

impl AllocationEngine {
    /// Build an engine, validating the configuration up front.
    pub fn new(cfg: EquiflowConfig) -> EquiflowResult<Self> {
        if let Err(e) = cfg.validate() {
            log::error!("engine configuration rejected: {e}");
            return Err(e);
        }
        Ok(Self::build(cfg))
    }

    /// Engine with the default configuration.
    pub fn default_params() -> Self {
        Self::build(EquiflowConfig::default())
    }

    fn build(cfg: EquiflowConfig) -> Self {
        Self {
            cfg,
            floors: Vec::new(),
            current: Vec::new(),
            stage: Vec::new(),
            trial: Vec::new(),
            best: Vec::new(),
            gradient: Vec::new(),
            proj_scratch: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    fn validate_inputs(
        &self,
        rates: &[f64],
        priorities: &[f64],
        initial: Option<&[f64]>,
    ) -> EquiflowResult<()> {
        if rates.is_empty() {
            return Err(EquiflowError::Validation(
                "no nodes to allocate".to_string(),
            ));
        }
        if rates.len() != priorities.len() {
            return Err(EquiflowError::Validation(format!(
                "rates and priorities must have equal length, got {} vs {}",
                rates.len(),
                priorities.len()
            )));
        }
        for (i, &l) in rates.iter().enumerate() {
            if !l.is_finite() || l < 0.0 {
                return Err(EquiflowError::Validation(format!(
                    "node {i}: arrival rate must be finite and >= 0, got {l}"
                )));
            }
        }
        for (i, &p) in priorities.iter().enumerate() {
            // Priorities are unbounded reals; only NaN/Inf is malformed.
            if !p.is_finite() {
                return Err(EquiflowError::Validation(format!(
                    "node {i}: priority must be finite, got {p}"
                )));
            }
        }
        if let Some(seed) = initial {
            if seed.len() != rates.len() {
                return Err(EquiflowError::Validation(format!(
                    "initial allocation must have length {}, got {}",
                    rates.len(),
                    seed.len()
                )));
            }
            for (i, &r) in seed.iter().enumerate() {
                if !r.is_finite() {
                    return Err(EquiflowError::Validation(format!(
                        "initial allocation {i} must be finite, got {r}"
                    )));
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Line search
    // ------------------------------------------------------------------

    /// Gradient step of the given size from `current`, projected back
    /// onto the pool; lands in `trial`.
    fn take_step(&mut self, step: f64) {
        for i in 0..self.current.len() {
            self.stage[i] = self.current[i] - step * self.gradient[i];
        }
        project_onto_pool(
            &self.stage,
            &self.floors,
            self.cfg.total_resources,
            &mut self.trial,
            &mut self.proj_scratch,
        );
    }

    // ------------------------------------------------------------------
    // Solve
    // ------------------------------------------------------------------

    /// Split the configured pool across nodes for one demand snapshot.
    ///
    /// Seeds from `initial` when given (the seed is projected, so it
    /// does not need to be feasible), otherwise from a uniform split.
    /// Returns the feasible minimiser with solver diagnostics, or
    /// [`EquiflowError::Optimization`] when the demand cannot fit or
    /// the iteration cap runs out.
    pub fn allocate(
        &mut self,
        rates: &[f64],
        priorities: &[f64],
        initial: Option<&[f64]>,
    ) -> EquiflowResult<AllocationOutcome> {
        if let Err(e) = self.validate_inputs(rates, priorities, initial) {
            log::error!("allocation rejected: {e}");
            return Err(e);
        }

        let pool = self.cfg.total_resources;
        let alpha = self.cfg.alpha;
        let beta = self.cfg.beta;
        let gamma = self.cfg.gamma;
        let n = rates.len();

        self.floors = stability_floors(rates, alpha, self.cfg.allocation_floor);
        let floor_sum: f64 = self.floors.iter().sum();
        if floor_sum > pool + FEASIBILITY_TOL {
            let diag = format!(
                "infeasible demand: stability floors need {floor_sum:.4} but the pool is {pool:.4}"
            );
            log::error!("allocation solve failed: {diag}");
            return Err(EquiflowError::Optimization(diag));
        }

        self.current.resize(n, 0.0);
        self.stage.resize(n, 0.0);
        self.trial.resize(n, 0.0);
        self.best.resize(n, 0.0);
        self.gradient.resize(n, 0.0);

        match initial {
            Some(seed) => self.stage.copy_from_slice(seed),
            None => {
                let uniform = pool / n as f64;
                for s in self.stage.iter_mut() {
                    *s = uniform;
                }
            }
        }
        project_onto_pool(
            &self.stage,
            &self.floors,
            pool,
            &mut self.current,
            &mut self.proj_scratch,
        );

        let mut f_current = objective(rates, priorities, &self.current, pool, alpha, beta, gamma);
        if !f_current.is_finite() {
            let diag = format!("objective is not finite at the starting point: {f_current}");
            log::error!("allocation solve failed: {diag}");
            return Err(EquiflowError::Numerical(diag));
        }

        let mut step = self.cfg.initial_step;
        let mut iterations = 0;
        let mut converged = false;
        let mut message = String::new();
        let mut last_displacement = f64::INFINITY;

        for iter in 1..=self.cfg.max_iterations {
            iterations = iter;
            objective_gradient(rates, &self.current, alpha, gamma, &mut self.gradient);

            let mut accepted = false;
            let mut f_best = f_current;

            self.take_step(step);
            let mut f_trial = objective(rates, priorities, &self.trial, pool, alpha, beta, gamma);

            if f_trial < f_current {
                accepted = true;
                f_best = f_trial;
                self.best.copy_from_slice(&self.trial);

                // Doubling: grow while the wider step still improves.
                loop {
                    let wider = step * 2.0;
                    self.take_step(wider);
                    f_trial = objective(rates, priorities, &self.trial, pool, alpha, beta, gamma);
                    if f_trial < f_best {
                        step = wider;
                        f_best = f_trial;
                        self.best.copy_from_slice(&self.trial);
                    } else {
                        break;
                    }
                }
            } else {
                // Backtracking: shrink until a step improves or gives out.
                while step > STEP_FLOOR {
                    step *= 0.5;
                    self.take_step(step);
                    f_trial = objective(rates, priorities, &self.trial, pool, alpha, beta, gamma);
                    if f_trial < f_current {
                        accepted = true;
                        f_best = f_trial;
                        self.best.copy_from_slice(&self.trial);
                        break;
                    }
                }
            }

            if !accepted {
                // No step size descends: the iterate is stationary on
                // the feasible set.
                converged = true;
                message =
                    format!("stationary at iteration {iter}: no step size improves the objective");
                break;
            }

            last_displacement = l2_distance(&self.best, &self.current);
            self.current.copy_from_slice(&self.best);
            f_current = f_best;

            if last_displacement < self.cfg.step_tolerance {
                converged = true;
                message = format!(
                    "converged at iteration {iter}: displacement {last_displacement:.3e} below tolerance"
                );
                break;
            }
        }

        if !converged {
            let diag = format!(
                "no convergence within {} iterations: last displacement {last_displacement:.3e} (tolerance {:.1e})",
                self.cfg.max_iterations, self.cfg.step_tolerance
            );
            log::error!("allocation solve failed: {diag}");
            return Err(EquiflowError::Optimization(diag));
        }

        log::info!(
            "allocation converged in {iterations} iterations (objective {f_current:.4}): {:?}",
            self.current
        );

        Ok(AllocationOutcome {
            allocations: self.current.clone(),
            objective: f_current,
            iterations,
            message,
        })
    }
}

fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
