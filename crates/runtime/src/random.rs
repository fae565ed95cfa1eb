//! `rand`-backed random source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use waltz_core::RandomSource;

/// [`RandomSource`] over the standard library RNG from `rand`.
///
/// Seeded instances replay the same battle for the same decisions.
#[derive(Clone, Debug)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_u32(&mut self) -> u32 {
        self.rng.r#gen()
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen()
    }

    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.gen_range(0..len))
    }
}
