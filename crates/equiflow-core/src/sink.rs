// ─────────────────────────────────────────────────────────────────────
// Equiflow — Allocation Sink Seam
// ─────────────────────────────────────────────────────────────────────
//! Delivery seam between the control loop and the enforcement plane.
//!
//! In production the southbound push sits behind this trait, whether
//! that is an OpenFlow meter update or a gNMI SetRequest.
//! `InMemorySink` records plans for tests and inspection.

use parking_lot::Mutex;

use equiflow_types::{EquiflowError, EquiflowResult};

/// Trait for allocation delivery backends.
pub trait AllocationSink: Send + Sync {
    /// Push one allocation plan to the enforcement plane.
    fn deliver(&self, allocations: &[f64]) -> EquiflowResult<()>;
}

/// Recording sink.
///
/// Thread-safe: the plan log is guarded by a `parking_lot::Mutex`.
#[derive(Default)]
pub struct InMemorySink {
    plans: Mutex<Vec<Vec<f64>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of plans delivered so far.
    pub fn delivery_count(&self) -> usize {
        self.plans.lock().len()
    }

    /// Most recently delivered plan, if any.
    pub fn last_plan(&self) -> Option<Vec<f64>> {
        self.plans.lock().last().cloned()
    }

    /// Full delivery log, oldest first.
    pub fn plans(&self) -> Vec<Vec<f64>> {
        self.plans.lock().clone()
    }
}

impl AllocationSink for InMemorySink {
    fn deliver(&self, allocations: &[f64]) -> EquiflowResult<()> {
        self.plans.lock().push(allocations.to_vec());
        Ok(())
    }
}

/// External sink that calls a delivery closure.
///
/// Bridges the flow-rule push layer; closure failures surface as
/// [`EquiflowError::Delivery`].
type DeliverFn = Box<dyn Fn(&[f64]) -> Result<(), String> + Send + Sync>;

pub struct ExternalSink {
    deliver_fn: DeliverFn,
}

impl ExternalSink {
    pub fn new(deliver_fn: impl Fn(&[f64]) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self {
            deliver_fn: Box::new(deliver_fn),
        }
    }
}

impl AllocationSink for ExternalSink {
    fn deliver(&self, allocations: &[f64]) -> EquiflowResult<()> {
        (self.deliver_fn)(allocations).map_err(EquiflowError::Delivery)
    }
}
