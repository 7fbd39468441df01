//! Seeded random choices made by the propagator

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Captured generator state
///
/// Restoring a snapshot makes every later choice repeat exactly, which is what
/// deterministic replay relies on.
#[derive(Clone, Debug)]
pub struct RandomState(StdRng);

/// Seeded random selector for reproducible stochastic choices
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform value in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Generic weighted random selection
    ///
    /// Returns an index into `weights` using the cumulative distribution.
    /// Non-positive weights are never chosen unless every weight is.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return 0;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        let mut last_positive = 0;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = i;
            rand_val -= weight;
            if rand_val <= 0.0 {
                return i;
            }
        }
        last_positive
    }

    /// Snapshot of the generator
    pub fn state(&self) -> RandomState {
        RandomState(self.rng.clone())
    }

    /// Rewind or fast-forward the generator to a snapshot
    pub fn restore(&mut self, state: &RandomState) {
        self.rng = state.0.clone();
    }
}
