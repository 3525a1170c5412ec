// ─────────────────────────────────────────────────────────────────────
// Equiflow — Feasible-Set Projection
// ─────────────────────────────────────────────────────────────────────
//! Exact Euclidean projection onto the allocation polytope
//!
//!   { R : Σ_i R_i = R_total,  R_i ≥ l_i }
//!
//! via sort-based simplex projection on the floor-shifted variables.

/// Per-node lower bounds: l_i = max(λ_i / α, floor).
///
/// Holding R_i at or above λ_i/α keeps the traffic intensity
/// ρ_i = λ_i / (α R_i) at or below 1; the floor keeps every bound
/// strictly positive even for idle nodes.
pub fn stability_floors(rates: &[f64], alpha: f64, floor: f64) -> Vec<f64> {
    rates.iter().map(|&l| (l / alpha).max(floor)).collect()
}

/// Project `point` onto { x : Σx = pool, x_i ≥ floors_i }, writing the
/// result into `out`.
///
/// All three slices must share one length. When the slack budget
/// pool - Σ floors is not positive, the floors are written out
/// unchanged.
pub fn project_onto_pool(
    point: &[f64],
    floors: &[f64],
    pool: f64,
    out: &mut [f64],
    scratch: &mut Vec<f64>,
) {
    debug_assert_eq!(point.len(), floors.len());
    debug_assert_eq!(point.len(), out.len());

    let budget = pool - floors.iter().sum::<f64>();
    if budget <= 0.0 {
        out.copy_from_slice(floors);
        return;
    }

    // Shift to simplex coordinates u_i = point_i - floors_i and
    // project onto { u ≥ 0, Σu = budget }.
    scratch.clear();
    scratch.extend(point.iter().zip(floors.iter()).map(|(&p, &f)| p - f));
    scratch.sort_unstable_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    // Water level: largest prefix of the sorted coordinates whose
    // common shift keeps every member positive.
    let mut cumsum = 0.0;
    let mut level = 0.0;
    for (j, &u) in scratch.iter().enumerate() {
        cumsum += u;
        let candidate = (cumsum - budget) / (j + 1) as f64;
        if u - candidate > 0.0 {
            level = candidate;
        } else {
            break;
        }
    }

    for i in 0..point.len() {
        out[i] = floors[i] + (point[i] - floors[i] - level).max(0.0);
    }
}
