#![forbid(unsafe_code)]

//! Seedable noise sources.
//!
//! Effects that need "random" jitter take a [`NoiseSource`] instead of
//! reaching for an ambient generator, so the same seed reproduces the same
//! frame in tests while runtime hosts seed from entropy.

use web_time::{SystemTime, UNIX_EPOCH};

/// Seed used when a caller supplies zero (xorshift has a fixed point at 0).
pub const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

/// A stream of uniformly distributed pseudo-random values.
pub trait NoiseSource {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Next value uniformly distributed in `[0.0, 1.0)`.
    #[inline]
    fn next_unit(&mut self) -> f32 {
        // 24 bits keeps every value exactly representable in f32.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Next value uniformly distributed in `[lo, hi)`.
    #[inline]
    fn next_range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_unit()
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    #[inline]
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }

    #[inline]
    fn next_range(&mut self, lo: f32, hi: f32) -> f32 {
        (**self).next_range(lo, hi)
    }
}

/// Xorshift32 generator (Marsaglia 13/17/5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator from a seed. A zero seed is replaced by
    /// [`DEFAULT_SEED`].
    #[inline]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Create a generator seeded from the wall clock.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let folded = nanos as u64 ^ (nanos >> 64) as u64;
        Self::new((folded ^ (folded >> 32)) as u32)
    }

    /// Current internal state (useful for snapshotting a run).
    #[inline]
    pub const fn state(&self) -> u32 {
        self.state
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl NoiseSource for XorShift32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
