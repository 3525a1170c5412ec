// ─────────────────────────────────────────────────────────────────────
// Equiflow — Lyapunov Stability Certifier
// ─────────────────────────────────────────────────────────────────────
//! Stochastic Lyapunov drift test over per-node traffic intensities:
//!
//!   ρ_i  = λ_i / s_i
//!   V(ρ) = Σ_i (ρ_i - ρ̄)²
//!   V̇   = 2 Σ_i (ρ_i - ρ̄) δ_i,   δ ~ N(0, ε²)
//!
//! The fleet is certified stable when the perturbed drift is strictly
//! negative: dispersion around the mean intensity is contracting.

use serde::{Deserialize, Serialize};

use equiflow_types::{EquiflowConfig, EquiflowError, EquiflowResult};

use crate::rng::SimpleRng;

/// Per-node traffic intensities ρ_i = λ_i / s_i.
///
/// Every service rate must be finite and strictly positive.
pub fn traffic_intensities(
    arrival_rates: &[f64],
    service_rates: &[f64],
) -> EquiflowResult<Vec<f64>> {
    if arrival_rates.len() != service_rates.len() {
        return Err(EquiflowError::Validation(format!(
            "arrival and service slices must have equal length, got {} vs {}",
            arrival_rates.len(),
            service_rates.len()
        )));
    }
    if arrival_rates.is_empty() {
        return Err(EquiflowError::Validation(
            "no nodes to certify".to_string(),
        ));
    }
    let mut rho = Vec::with_capacity(arrival_rates.len());
    for (i, (&lambda, &s)) in arrival_rates.iter().zip(service_rates.iter()).enumerate() {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(EquiflowError::Validation(format!(
                "node {i}: arrival rate must be finite and >= 0, got {lambda}"
            )));
        }
        if !s.is_finite() || s <= 0.0 {
            return Err(EquiflowError::Validation(format!(
                "node {i}: service rate must be finite and > 0, got {s}"
            )));
        }
        rho.push(lambda / s);
    }
    Ok(rho)
}

/// V(ρ) = Σ_i (ρ_i - ρ̄)².
pub fn lyapunov_value(intensities: &[f64]) -> f64 {
    if intensities.is_empty() {
        return 0.0;
    }
    let mean = intensities.iter().sum::<f64>() / intensities.len() as f64;
    intensities.iter().map(|&r| (r - mean) * (r - mean)).sum()
}

/// Drift of V along a perturbation δ: V̇ = 2 Σ_i (ρ_i - ρ̄) δ_i.
pub fn directional_derivative(intensities: &[f64], perturbation: &[f64]) -> f64 {
    if intensities.is_empty() {
        return 0.0;
    }
    let mean = intensities.iter().sum::<f64>() / intensities.len() as f64;
    2.0 * intensities
        .iter()
        .zip(perturbation.iter())
        .map(|(&r, &d)| (r - mean) * d)
        .sum::<f64>()
}

/// Outcome of one stability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityReport {
    /// Lyapunov dispersion V (≥ 0, lower = tighter load balance).
    pub v: f64,
    /// Perturbed drift V̇ (negative = contracting).
    pub v_dot: f64,
    /// Certification verdict: V̇ < 0.
    pub stable: bool,
    /// Mean traffic intensity ρ̄.
    pub rho_bar: f64,
    /// Largest per-node intensity; above 1.0 the node is saturated.
    pub max_intensity: f64,
}

/// Stochastic stability certifier for a fleet's traffic intensities.
///
/// Owns its noise source; the same seed replays the same verdict
/// sequence.
pub struct StabilityCertifier {
    alpha: f64,
    epsilon: f64,
    rng: SimpleRng,
    perturbation: Vec<f64>,
}

impl StabilityCertifier {
    pub fn new(alpha: f64, epsilon: f64, seed: u64) -> Self {
        Self {
            alpha,
            epsilon,
            rng: SimpleRng::new(seed),
            perturbation: Vec::new(),
        }
    }

    /// Build from the shared pipeline configuration.
    pub fn from_config(cfg: &EquiflowConfig) -> Self {
        Self::new(cfg.alpha, cfg.epsilon, cfg.seed)
    }

    /// Restart the perturbation sequence from a fresh seed.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SimpleRng::new(seed);
    }

    /// Certify a fleet given explicit per-node service rates.
    ///
    /// Each call consumes one perturbation draw per node, so repeated
    /// checks on identical inputs may disagree; that randomness is the
    /// point of the drift test.
    pub fn check(
        &mut self,
        arrival_rates: &[f64],
        service_rates: &[f64],
    ) -> EquiflowResult<StabilityReport> {
        let rho = match traffic_intensities(arrival_rates, service_rates) {
            Ok(rho) => rho,
            Err(e) => {
                log::error!("stability check rejected input: {e}");
                return Err(e);
            }
        };

        let rho_bar = rho.iter().sum::<f64>() / rho.len() as f64;
        let v = lyapunov_value(&rho);

        self.perturbation.resize(rho.len(), 0.0);
        self.rng.fill_normal(&mut self.perturbation, self.epsilon);
        let v_dot = directional_derivative(&rho, &self.perturbation);

        if !v.is_finite() || !v_dot.is_finite() {
            let diag = format!("non-finite drift: V={v}, V_dot={v_dot}");
            log::error!("stability check failed: {diag}");
            return Err(EquiflowError::Numerical(diag));
        }

        let max_intensity = rho.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max_intensity > 1.0 {
            log::warn!("saturated node: max traffic intensity {max_intensity:.4} exceeds 1");
        }

        Ok(StabilityReport {
            v,
            v_dot,
            stable: v_dot < 0.0,
            rho_bar,
            max_intensity,
        })
    }

    /// Certify an allocation plan, deriving service rates as `alpha * R_i`.
    pub fn analyze(
        &mut self,
        arrival_rates: &[f64],
        allocations: &[f64],
    ) -> EquiflowResult<StabilityReport> {
        let service_rates: Vec<f64> = allocations.iter().map(|&r| self.alpha * r).collect();
        self.check(arrival_rates, &service_rates)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}
