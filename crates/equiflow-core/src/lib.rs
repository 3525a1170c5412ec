// ─────────────────────────────────────────────────────────────────────
// Equiflow — Control-Loop Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Control-loop coordinator for telemetry-driven capacity allocation:
//! samples fleet demand, solves the capacity split, certifies queue
//! stability, and pushes the plan to the enforcement plane.
//!
//! # Operating Invariants
//!
//! 1. **Validation precedes numeric work**: configuration is checked at
//!    construction and every demand snapshot is checked before the
//!    solver or certifier runs; malformed input never reaches the
//!    arithmetic.
//!
//! 2. **Fail fast, deliver nothing on failure**: a cycle that fails at
//!    any step pushes no plan to the sink and returns the error
//!    unchanged. There is no fallback allocation and no forced
//!    stability verdict.
//!
//! 3. **Serialized engines, shared-reference driving**: the allocator
//!    and certifier step internal scratch state, so each sits behind a
//!    `parking_lot::Mutex`; `run_cycle(&self)` is safe to call from
//!    multiple threads.
//!
//! 4. **Bounded history**: retained reports never exceed
//!    `history_window`; the cycle counter moves only on success and the
//!    failure counter only on error.

pub mod coordinator;
pub mod demand;
pub mod sink;

pub use coordinator::{Coordinator, CycleReport};
pub use demand::{DemandSource, ExternalDemand, StaticDemand};
pub use sink::{AllocationSink, ExternalSink, InMemorySink};
