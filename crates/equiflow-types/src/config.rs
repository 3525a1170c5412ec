// ─────────────────────────────────────────────────────────────────────
// Equiflow — Runtime Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{EquiflowError, EquiflowResult};

/// Runtime configuration for the Equiflow pipeline.
///
/// One struct feeds every component: the allocation engine reads the
/// cost weights and solver knobs, the stability certifier reads
/// `alpha`, `epsilon`, and `seed`, and the coordinator reads
/// `history_window`. Missing JSON keys fall back to the defaults
/// below; unknown keys are ignored so a single deployment document
/// can also configure neighbouring services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EquiflowConfig {
    /// Total resource pool split across nodes each cycle.
    /// Default: 1000.0.
    pub total_resources: f64,

    /// Service-rate coefficient: node i serves at `alpha * R_i`.
    /// Default: 0.1.
    pub alpha: f64,

    /// Weight of the priority term in the per-node delay cost.
    /// Default: 0.1.
    pub beta: f64,

    /// Weight of the underutilisation penalty.
    /// Default: 0.1.
    pub gamma: f64,

    /// Standard deviation of the certifier's stochastic perturbation.
    /// Default: 1e-5.
    pub epsilon: f64,

    /// Iteration cap for the allocation solver.
    /// Default: 100.
    pub max_iterations: usize,

    /// Strictly positive lower bound kept on every allocation.
    /// Default: 1e-6.
    pub allocation_floor: f64,

    /// Convergence threshold on iterate displacement (L2 norm).
    /// Default: 1e-9.
    pub step_tolerance: f64,

    /// Initial gradient step size; the line search adapts from here.
    /// Default: 1.0.
    pub initial_step: f64,

    /// Number of recent cycle reports the coordinator retains.
    /// Default: 16.
    pub history_window: usize,

    /// Seed for the certifier's perturbation RNG.
    /// Default: 42.
    pub seed: u64,
}

impl Default for EquiflowConfig {
    fn default() -> Self {
        Self {
            total_resources: 1000.0,
            alpha: 0.1,
            beta: 0.1,
            gamma: 0.1,
            epsilon: 1e-5,
            max_iterations: 100,
            allocation_floor: 1e-6,
            step_tolerance: 1e-9,
            initial_step: 1.0,
            history_window: 16,
            seed: 42,
        }
    }
}

impl EquiflowConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> EquiflowResult<()> {
        if !self.total_resources.is_finite() || self.total_resources <= 0.0 {
            return Err(EquiflowError::Config(format!(
                "total_resources must be finite and > 0, got {}",
                self.total_resources
            )));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(EquiflowError::Config(format!(
                "alpha must be finite and > 0, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(EquiflowError::Config(format!(
                "beta must be finite and >= 0, got {}",
                self.beta
            )));
        }
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(EquiflowError::Config(format!(
                "gamma must be finite and >= 0, got {}",
                self.gamma
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(EquiflowError::Config(format!(
                "epsilon must be finite and > 0, got {}",
                self.epsilon
            )));
        }
        if self.max_iterations < 1 {
            return Err(EquiflowError::Config(format!(
                "max_iterations must be >= 1, got {}",
                self.max_iterations
            )));
        }
        if !self.allocation_floor.is_finite() || self.allocation_floor <= 0.0 {
            return Err(EquiflowError::Config(format!(
                "allocation_floor must be finite and > 0, got {}",
                self.allocation_floor
            )));
        }
        if self.allocation_floor >= self.total_resources {
            return Err(EquiflowError::Config(format!(
                "allocation_floor must be < total_resources, got {} >= {}",
                self.allocation_floor, self.total_resources
            )));
        }
        if !self.step_tolerance.is_finite() || self.step_tolerance <= 0.0 {
            return Err(EquiflowError::Config(format!(
                "step_tolerance must be finite and > 0, got {}",
                self.step_tolerance
            )));
        }
        if !self.initial_step.is_finite() || self.initial_step <= 0.0 {
            return Err(EquiflowError::Config(format!(
                "initial_step must be finite and > 0, got {}",
                self.initial_step
            )));
        }
        if self.history_window < 1 {
            return Err(EquiflowError::Config(format!(
                "history_window must be >= 1, got {}",
                self.history_window
            )));
        }
        Ok(())
    }

    /// Load from JSON string, filling missing fields from defaults.
    pub fn from_json(json: &str) -> EquiflowResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| EquiflowError::Config(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
