//! Deterministic random number generation.
//!
//! Every random draw in the engine (board generation, deck shuffles,
//! keypad and safe dice, patrol queue refills) flows through an
//! [`RngOracle`] keyed by an explicit counter. The counter lives in
//! [`GameState::rng_state`](crate::state::GameState), so replaying the
//! same action sequence on any client yields the same draws.

/// Oracle producing a random 32-bit value for a given stream position.
///
/// Implementations must be pure: the same seed always maps to the same
/// output.
pub trait RngOracle {
    fn next_u32(&self, seed: i64) -> u32;

    /// Roll a six-sided die (1-6 inclusive).
    fn roll_d6(&self, seed: i64) -> u8 {
        (self.next_u32(seed) % 6) as u8 + 1
    }

    /// Uniform index into a collection of `len` elements.
    fn pick(&self, seed: i64, len: usize) -> usize {
        debug_assert!(len > 0);
        self.next_u32(seed) as usize % len
    }
}

/// Production oracle: fractional part of `sin(n) * 10000`, scaled to u32.
///
/// Not cryptographic, but cheap and fully reproducible given the same
/// counter sequence, which is all the rules engine needs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SinRng;

impl RngOracle for SinRng {
    fn next_u32(&self, seed: i64) -> u32 {
        let x = (seed as f64).sin() * 10_000.0;
        let frac = x - x.floor();
        (frac * u32::MAX as f64) as u32
    }
}

/// Hashes a seed string into the initial stream counter.
///
/// Classic `h = h * 31 + byte` with wrapping 32-bit signed arithmetic.
pub fn hash_seed(seed: &str) -> i32 {
    let mut hash: i32 = 0;
    for &byte in seed.as_bytes() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(byte as i32);
    }
    hash
}

/// An advancing cursor over an [`RngOracle`] stream.
///
/// Borrowed for the duration of an operation; the final counter is written
/// back to the state afterwards.
pub struct RngStream<'a> {
    oracle: &'a dyn RngOracle,
    counter: i64,
}

impl<'a> RngStream<'a> {
    pub fn new(oracle: &'a dyn RngOracle, counter: i64) -> Self {
        Self { oracle, counter }
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn next_u32(&mut self) -> u32 {
        let value = self.oracle.next_u32(self.counter);
        self.counter += 1;
        value
    }

    pub fn roll_d6(&mut self) -> u8 {
        let value = self.oracle.roll_d6(self.counter);
        self.counter += 1;
        value
    }

    pub fn pick(&mut self, len: usize) -> usize {
        let value = self.oracle.pick(self.counter, len);
        self.counter += 1;
        value
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.pick(i + 1);
            slice.swap(i, j);
        }
    }
}
