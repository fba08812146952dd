//! Seeded random source shared by every generation phase.

use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Cave generation RNG
///
/// One instance is owned by the pipeline; fill, room placement, noise seeding
/// and tunnel jitter all draw from it so a seed replays a run exactly.
#[derive(Debug, Clone)]
pub struct CaveRng {
    rng: Xoshiro256PlusPlus,
    seed: u64,
}

impl CaveRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `0..n`; returns 0 if n is 0.
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform value in `lo..hi`; returns `lo` when the range is empty.
    pub fn range(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Uniform value in `lo..=hi`
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    pub fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }
}
