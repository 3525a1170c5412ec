// ─────────────────────────────────────────────────────────────────────
// Equiflow — Demand Source Seam
// ─────────────────────────────────────────────────────────────────────
//! Telemetry ingestion seam for the control loop.
//!
//! In production the monitoring plane sits behind this trait, whether
//! that is a NetFlow collector or a gNMI subscription. `StaticDemand`
//! replays a fixed snapshot for tests and offline tuning.

use equiflow_types::{DemandSnapshot, EquiflowError, EquiflowResult};

/// Trait for fleet demand sources.
pub trait DemandSource: Send + Sync {
    /// Produce one synchronized demand reading for the whole fleet.
    fn sample(&self) -> EquiflowResult<DemandSnapshot>;
}

/// Fixed-snapshot source.
///
/// Every call to [`sample`](DemandSource::sample) returns a clone of
/// the wrapped snapshot.
pub struct StaticDemand {
    snapshot: DemandSnapshot,
}

impl StaticDemand {
    pub fn new(snapshot: DemandSnapshot) -> Self {
        Self { snapshot }
    }

    /// Convenience constructor from parallel rate / priority slices.
    pub fn from_rates(rates: &[f64], priorities: &[f64]) -> EquiflowResult<Self> {
        Ok(Self::new(DemandSnapshot::from_rates(rates, priorities)?))
    }
}

impl DemandSource for StaticDemand {
    fn sample(&self) -> EquiflowResult<DemandSnapshot> {
        Ok(self.snapshot.clone())
    }
}

/// External demand source that calls a sampling closure.
///
/// Bridges a live monitoring layer into the control loop while keeping
/// the cycle logic free of transport concerns. Closure failures
/// surface as [`EquiflowError::Telemetry`].
type SampleFn = Box<dyn Fn() -> Result<DemandSnapshot, String> + Send + Sync>;

pub struct ExternalDemand {
    sample_fn: SampleFn,
}

impl ExternalDemand {
    pub fn new(
        sample_fn: impl Fn() -> Result<DemandSnapshot, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            sample_fn: Box::new(sample_fn),
        }
    }
}

impl DemandSource for ExternalDemand {
    fn sample(&self) -> EquiflowResult<DemandSnapshot> {
        (self.sample_fn)().map_err(EquiflowError::Telemetry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_demand_replays_snapshot() {
        let source = StaticDemand::from_rates(&[10.0, 20.0], &[1.0, 2.0]).unwrap();
        let a = source.sample().unwrap();
        let b = source.sample().unwrap();
        assert_eq!(a.arrival_rates(), b.arrival_rates());
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_static_demand_rejects_mismatched_lengths() {
        assert!(StaticDemand::from_rates(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_external_demand_success() {
        let source = ExternalDemand::new(|| {
            DemandSnapshot::from_rates(&[5.0], &[1.0]).map_err(|e| e.to_string())
        });
        let snapshot = source.sample().unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_external_demand_failure_is_telemetry() {
        let source = ExternalDemand::new(|| Err("collector offline".to_string()));
        match source.sample() {
            Err(EquiflowError::Telemetry(msg)) => assert!(msg.contains("offline")),
            other => panic!("expected telemetry error, got {other:?}"),
        }
    }
}
