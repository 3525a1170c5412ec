// ─────────────────────────────────────────────────────────────────────
// Equiflow — Capacity Allocator
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Constrained nonlinear capacity allocation: splits a fixed resource
//! pool across demand nodes by projected gradient descent, keeping
//! every node's traffic intensity at or below 1.
//!
//! Architecture:
//!   - objective: delay + underutilisation cost terms and gradients
//!   - projection: exact Euclidean projection onto the pool polytope
//!   - engine: warm-started line-search descent loop

pub mod engine;
pub mod objective;
pub mod projection;

pub use engine::{AllocationEngine, AllocationOutcome};
pub use objective::{delay_cost, objective, objective_gradient, underutil_cost};
pub use projection::{project_onto_pool, stability_floors};
