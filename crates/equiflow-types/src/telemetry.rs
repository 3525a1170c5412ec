// ─────────────────────────────────────────────────────────────────────
// Equiflow — Telemetry Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{EquiflowError, EquiflowResult};

/// Scrub a raw telemetry counter: NaN, infinities, and negative
/// readings all collapse to 0.0.
///
/// Flow collectors occasionally emit garbage on counter wrap or link
/// flap; a zero reading is always safe downstream.
#[inline]
pub fn clamp_rate(value: f64) -> f64 {
    if !value.is_finite() {
        log::warn!("clamp_rate: non-finite reading {value}, clamping to 0.0");
        return 0.0;
    }
    if value < 0.0 {
        log::warn!("clamp_rate: negative reading {value:.4}, clamping to 0.0");
        return 0.0;
    }
    value
}

/// Rescale raw counters to [0, 1] in place.
///
/// Leaves the slice untouched when all readings are equal, since a
/// degenerate span carries no ordering information.
pub fn min_max_normalise(values: &mut [f64]) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values.iter() {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let span = hi - lo;
    if !span.is_finite() || span <= f64::EPSILON {
        return;
    }
    for v in values.iter_mut() {
        *v = (*v - lo) / span;
    }
}

/// Observed demand at a single fleet node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDemand {
    /// Packet arrival rate lambda_i (requests per second).
    pub arrival_rate: f64,
    /// Operator-assigned priority weight P_i.
    pub priority_level: f64,
}

impl NodeDemand {
    /// Scrubs the arrival rate only: rates come off the wire and may be
    /// garbage, while the priority is operator-assigned configuration
    /// (unbounded, negative allowed) and is judged by `validate()`.
    pub fn new(arrival_rate: f64, priority_level: f64) -> Self {
        Self {
            arrival_rate: clamp_rate(arrival_rate),
            priority_level,
        }
    }
}

/// One synchronized demand reading across the whole fleet.
///
/// This is the unit the allocator consumes: every node's arrival rate
/// and priority, sampled in the same collection window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemandSnapshot {
    pub nodes: Vec<NodeDemand>,
}

impl DemandSnapshot {
    /// Build a snapshot from parallel rate and priority slices.
    pub fn from_rates(rates: &[f64], priorities: &[f64]) -> EquiflowResult<Self> {
        if rates.len() != priorities.len() {
            return Err(EquiflowError::Validation(format!(
                "rates and priorities must have equal length, got {} vs {}",
                rates.len(),
                priorities.len()
            )));
        }
        let nodes = rates
            .iter()
            .zip(priorities.iter())
            .map(|(&r, &p)| NodeDemand::new(r, p))
            .collect();
        Ok(Self { nodes })
    }

    pub fn arrival_rates(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.arrival_rate).collect()
    }

    pub fn priority_levels(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.priority_level).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check the snapshot is usable by the allocator.
    ///
    /// Snapshots built through [`from_rates`](Self::from_rates) always
    /// pass; this guards hand-assembled ones.
    pub fn validate(&self) -> EquiflowResult<()> {
        if self.nodes.is_empty() {
            return Err(EquiflowError::Validation(
                "demand snapshot contains no nodes".to_string(),
            ));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.arrival_rate.is_finite() || node.arrival_rate < 0.0 {
                return Err(EquiflowError::Validation(format!(
                    "node {i}: arrival_rate must be finite and >= 0, got {}",
                    node.arrival_rate
                )));
            }
            if !node.priority_level.is_finite() {
                return Err(EquiflowError::Validation(format!(
                    "node {i}: priority_level must be finite, got {}",
                    node.priority_level
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_rate(f64::NAN), 0.0);
    }

    #[test]
    fn test_clamp_inf() {
        assert_eq!(clamp_rate(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_clamp_negative() {
        assert_eq!(clamp_rate(-3.5), 0.0);
    }

    #[test]
    fn test_clamp_normal() {
        assert_eq!(clamp_rate(12.5), 12.5);
    }

    #[test]
    fn test_node_demand_scrubs_rate_only() {
        let n = NodeDemand::new(f64::NAN, -2.0);
        assert_eq!(n.arrival_rate, 0.0);
        assert_eq!(n.priority_level, -2.0, "priority must pass through untouched");
    }

    #[test]
    fn test_negative_priority_passes_validation() {
        let snap = DemandSnapshot::from_rates(&[10.0, 20.0], &[-1.0, 1.0]).unwrap();
        assert!(snap.validate().is_ok());
        assert_eq!(snap.priority_levels(), vec![-1.0, 1.0]);
    }

    #[test]
    fn test_validate_rejects_nan_priority() {
        let snap = DemandSnapshot {
            nodes: vec![NodeDemand {
                arrival_rate: 1.0,
                priority_level: f64::NAN,
            }],
        };
        assert!(snap.validate().is_err());
    }

    #[test]
    fn test_from_rates_roundtrip() {
        let snap = DemandSnapshot::from_rates(&[10.0, 20.0], &[1.0, 2.0]).unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.arrival_rates(), vec![10.0, 20.0]);
        assert_eq!(snap.priority_levels(), vec![1.0, 2.0]);
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn test_from_rates_length_mismatch() {
        let err = DemandSnapshot::from_rates(&[10.0, 20.0], &[1.0]).unwrap_err();
        assert!(matches!(err, EquiflowError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(DemandSnapshot::default().validate().is_err());
    }

    #[test]
    fn test_validate_rejects_hand_built_nan() {
        let snap = DemandSnapshot {
            nodes: vec![NodeDemand {
                arrival_rate: f64::NAN,
                priority_level: 1.0,
            }],
        };
        assert!(snap.validate().is_err());
    }

    #[test]
    fn test_normalise_basic() {
        let mut v = vec![10.0, 20.0, 30.0];
        min_max_normalise(&mut v);
        assert!((v[0] - 0.0).abs() < 1e-12);
        assert!((v[1] - 0.5).abs() < 1e-12);
        assert!((v[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalise_degenerate_span_is_noop() {
        let mut v = vec![7.0, 7.0, 7.0];
        min_max_normalise(&mut v);
        assert_eq!(v, vec![7.0, 7.0, 7.0]);
    }
}
