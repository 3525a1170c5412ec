// ─────────────────────────────────────────────────────────────────────
// Equiflow — Stability Certifier
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Lyapunov stability certification for fleet load: traffic-intensity
//! dispersion as the potential, a seeded stochastic drift test as the
//! verdict.

pub mod lyapunov;
pub mod rng;

pub use lyapunov::{
    directional_derivative, lyapunov_value, traffic_intensities, StabilityCertifier,
    StabilityReport,
};
pub use rng::SimpleRng;
