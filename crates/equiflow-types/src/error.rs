// ─────────────────────────────────────────────────────────────────────
// Equiflow — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Equiflow failures.
#[derive(Error, Debug)]
pub enum EquiflowError {
    /// Invalid input (demand snapshot, service rates, parameters).
    #[error("validation error: {0}")]
    Validation(String),

    /// Allocation solver failed to converge or the problem is infeasible.
    #[error("optimization failure: {0}")]
    Optimization(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Telemetry source failed to produce a demand snapshot.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Delivery of an allocation plan to the control plane failed.
    #[error("delivery error: {0}")]
    Delivery(String),
}

pub type EquiflowResult<T> = Result<T, EquiflowError>;
