//! Board shuffling RNG.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++), which is fast and
//! works under WASM. Unseeded instances draw entropy from `getrandom`
//! (browser crypto API on wasm32, the OS elsewhere).

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A seedable RNG used for every random decision in board generation.
///
/// Seed it for reproducible levels (tests, daily puzzles), or create it from
/// system entropy for normal play.
pub struct TileRng {
    inner: SmallRng,
}

impl TileRng {
    /// Create from system entropy.
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic boards.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform in-place Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

impl Default for TileRng {
    fn default() -> Self {
        Self::new()
    }
}
