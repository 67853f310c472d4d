//! Deterministic float stream and seed mixing helpers shared by generation and exploration.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Sub-stream used by the affix catalog roll.
pub(crate) const AFFIX_STREAM: u64 = 0xA1F1;
/// Sub-stream used to pick the dungeon name and description.
pub(crate) const NAME_STREAM: u64 = 0x4E41;
/// Sub-stream used for runtime rolls during exploration (traps, loot).
pub(crate) const EXPLORATION_STREAM: u64 = 0xE5C0;

/// Reproducible stream of floats in `[0, 1)` built from a 32-bit seed.
///
/// Two sources built from the same seed yield the same sequence for the same number of
/// draws. Every generation phase draws from one shared source in a fixed order.
#[derive(Clone, Debug)]
pub struct SeededRandomSource {
    rng: ChaCha8Rng,
}

impl SeededRandomSource {
    pub fn new(seed: u32) -> Self {
        Self::from_u64(u64::from(seed))
    }

    pub(crate) fn from_u64(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Source for an independent sub-stream that never perturbs the main generation stream.
    pub(crate) fn derived(seed: u32, stream: u64) -> Self {
        Self::from_u64(mix_seed_stream(u64::from(seed), stream))
    }

    pub fn next_f64(&mut self) -> f64 {
        // 53 high bits give every representable step in [0, 1).
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let picked = (self.next_f64() * len as f64) as usize;
        picked.min(len - 1)
    }

    /// Uniform integer in `min..=max`.
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        min + self.index((max - min + 1) as usize) as u32
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform in-place permutation (Fisher-Yates) drawing from this source.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

impl Iterator for SeededRandomSource {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}

/// Splitmix-style finalizer deriving an independent seed for `stream` from `seed`.
pub fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}
