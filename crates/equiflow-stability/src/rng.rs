// ─────────────────────────────────────────────────────────────────────
// Equiflow — Seeded Noise Source
// ─────────────────────────────────────────────────────────────────────
//! Deterministic RNG behind the certifier's stochastic perturbations.
//!
//! The randomized verdict is part of the certifier's contract, so the
//! noise source must be seedable: the same seed replays the same
//! perturbation sequence bit for bit.

/// Minimal xorshift64 RNG for noise generation (no external dep).
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Seed the generator; zero is remapped to a fixed non-zero
    /// constant (zero is a fixed point of xorshift).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF_CAFE_BABE } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximate standard normal via Box-Muller.
    pub fn next_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-300);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// Fill `out` with N(0, sigma²) draws.
    pub fn fill_normal(&mut self, out: &mut [f64], sigma: f64) {
        for v in out.iter_mut() {
            *v = sigma * self.next_normal();
        }
    }
}
