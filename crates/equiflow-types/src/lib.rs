// ─────────────────────────────────────────────────────────────────────
// Equiflow — Core Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for Equiflow,
//! the adaptive capacity allocator for SDN-managed IoT fleets.

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::EquiflowConfig;
pub use error::{EquiflowError, EquiflowResult};
pub use telemetry::{DemandSnapshot, NodeDemand};
