/// Uniform random source consumed by graph building and the simulations.
///
/// Every stochastic decision in the engines goes through this trait so callers can inject a
/// seeded [`Rng64`] for reproducible renders or a [`ScriptedRandom`] to force exact outcomes.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform sample in `[lo, lo + span)`.
    fn span(&mut self, lo: f64, span: f64) -> f64 {
        lo + self.next_f64() * span
    }

    /// Uniform index in `[0, n)`; `n` must be non-zero.
    fn index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        ((self.next_f64() * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// Uniform angle in `[0, 2π)`.
    fn angle(&mut self) -> f64 {
        self.next_f64() * std::f64::consts::TAU
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// SplitMix64 generator; deterministic for a given seed.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Derive an independent stream for a named consumer.
    pub fn fork(seed: u64, stream: u64) -> Self {
        let mut base = Self::new(seed ^ stream.wrapping_mul(0xD6E8_FEB8_6659_FD93));
        Self::new(base.next_u64())
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Next value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

impl RandomSource for Rng64 {
    fn next_f64(&mut self) -> f64 {
        self.next_f64_01()
    }
}

/// Replays a fixed cycle of samples. Intended for tests that need exact outcomes.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    pos: usize,
}

impl ScriptedRandom {
    /// Cycle through `values` (each clamped into `[0, 1)`); an empty list always yields 0.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(0.0, 0.999_999_999) } else { 0.0 })
            .collect();
        Self { values, pos: 0 }
    }

    /// Always return `v`.
    pub fn constant(v: f64) -> Self {
        Self::new(vec![v])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos = self.pos.wrapping_add(1);
        v
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
