//! Injectable uniform random sources for trait sampling
//!
//! Sampling never reaches for ambient process-wide randomness; the caller
//! supplies a source, which makes runs reproducible under a fixed seed and
//! lets tests script exact draw sequences.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of uniform draws in `[0, 1)`
pub trait UnitSource {
    /// Produce the next uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

/// Seeded pseudo-random source for reproducible collection runs
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Create a deterministic source from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl UnitSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed draw sequence, cycling once exhausted
///
/// Intended for tests that pin exact sampling outcomes.
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Create a source replaying `draws` in order
    pub const fn new(draws: Vec<f64>) -> Self {
        Self { draws, cursor: 0 }
    }
}

impl UnitSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self
            .draws
            .get(self.cursor % self.draws.len())
            .copied()
            .unwrap_or(0.0);
        self.cursor += 1;
        value
    }
}
