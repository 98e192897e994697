//! Deterministic uniform generator.
//!
//! The generator is a SplitMix64 sequence: the state is a single `u64` that is
//! advanced by a fixed odd increment, and each output is a bijective mix of the
//! new state. [`next`] exposes the step as a pure function so that replaying a
//! run needs nothing but the seed and the number of draws consumed.
//!
//! [`SeededGenerator`] wraps the same step and implements [`rand_core::RngCore`],
//! so the samplers in [`crate::sampling`] accept it like any other `rand::Rng`.
//! Uniforms produced by [`SeededGenerator::next_uniform`] use the same 53-bit
//! construction as `rand`'s `f64` sampling, so both paths agree bit for bit.

use rand_core::{impls, RngCore, SeedableRng};

/// SplitMix64 state increment (2^64 / φ, rounded to odd).
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// 2^-53, the spacing of uniforms built from the top 53 bits.
const UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Finalizer applied to the advanced state.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn to_unit(bits: u64) -> f64 {
    (bits >> 11) as f64 * UNIT
}

/// Advance `state` once, returning a uniform draw in `[0, 1)` and the new state.
///
/// This is a pure function: the same input state always yields the same pair.
pub fn next(state: u64) -> (f64, u64) {
    let new_state = state.wrapping_add(GOLDEN_GAMMA);
    (to_unit(mix(new_state)), new_state)
}

/// Seeded uniform source for trajectories and sequential tests.
///
/// Not thread-safe by intent; each run owns its generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededGenerator {
    state: u64,
    draws: u64,
}

impl SeededGenerator {
    /// Create a generator whose first draw is `next(seed)`.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed,
            draws: 0,
        }
    }

    /// Draw a uniform in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        let (u, state) = next(self.state);
        self.state = state;
        self.draws += 1;
        u
    }

    /// Current internal state.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Number of 64-bit outputs consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RngCore for SeededGenerator {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        self.draws += 1;
        mix(self.state)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for SeededGenerator {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
