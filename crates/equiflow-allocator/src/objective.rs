// ─────────────────────────────────────────────────────────────────────
// Equiflow — Allocation Cost Terms
// ─────────────────────────────────────────────────────────────────────
//! Cost terms for the capacity allocation program:
//!
//!   f(R) = Σ_i λ_i (1/(α R_i) + β P_i)  +  Σ_i γ (R_total - R_i)
//!
//! The first sum is queueing delay weighted by demand and priority,
//! the second penalises capacity left idle.

/// Delay cost: Σ_i λ_i · (1/(α R_i) + β P_i).
pub fn delay_cost(
    rates: &[f64],
    priorities: &[f64],
    allocations: &[f64],
    alpha: f64,
    beta: f64,
) -> f64 {
    let n = rates.len().min(priorities.len()).min(allocations.len());
    let mut cost = 0.0;
    for i in 0..n {
        cost += rates[i] * (1.0 / (alpha * allocations[i]) + beta * priorities[i]);
    }
    cost
}

/// Idle-capacity penalty: Σ_i γ · (R_total - R_i).
pub fn underutil_cost(allocations: &[f64], total: f64, gamma: f64) -> f64 {
    allocations.iter().map(|&r| gamma * (total - r)).sum()
}

/// Full objective f(R) = delay_cost + underutil_cost.
pub fn objective(
    rates: &[f64],
    priorities: &[f64],
    allocations: &[f64],
    total: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> f64 {
    delay_cost(rates, priorities, allocations, alpha, beta)
        + underutil_cost(allocations, total, gamma)
}

/// Analytic gradient: ∂f/∂R_i = -λ_i / (α R_i²) - γ.
///
/// The β·λ_i·P_i and γ·R_total terms are constant in R and drop out.
/// `grad_out` must have the same length as `allocations`.
pub fn objective_gradient(
    rates: &[f64],
    allocations: &[f64],
    alpha: f64,
    gamma: f64,
    grad_out: &mut [f64],
) {
    debug_assert_eq!(rates.len(), allocations.len());
    debug_assert_eq!(rates.len(), grad_out.len());
    for i in 0..rates.len() {
        let r = allocations[i];
        grad_out[i] = -rates[i] / (alpha * r * r) - gamma;
    }
}

/// Central-difference gradient of an arbitrary cost over allocations.
///
/// Used to cross-check the analytic form; ~2N evaluations of `f`.
pub fn gradient_fd<F>(allocations: &[f64], eps: f64, mut f: F) -> Vec<f64>
where
    F: FnMut(&[f64]) -> f64,
{
    let dim = allocations.len();
    let mut grad = vec![0.0; dim];
    let mut probe = allocations.to_vec();

    for i in 0..dim {
        probe[i] = allocations[i] + eps;
        let f_plus = f(&probe);

        probe[i] = allocations[i] - eps;
        let f_minus = f(&probe);

        grad[i] = (f_plus - f_minus) / (2.0 * eps);
        probe[i] = allocations[i]; // restore
    }

    grad
}
