//! Injectable pseudo-random source shared by the sampling generators.
//!
//! A single [`RandomSource`] is seeded once per process and handed to every
//! generator that draws (colour sampler, checkerboard square count, Perlin
//! offsets).  Seeding it explicitly makes a whole batch reproducible; parallel
//! batches derive one independent source per index with [`RandomSource::for_index`].

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

/// Seedable PRNG capability passed into generator constructors.
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Deterministic source for reproducible runs and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Independent per-index stream derived from a root seed.
    ///
    /// The derivation depends only on `(seed, index)`, so the content of index
    /// `i` does not depend on which worker thread produced it or in what order.
    pub fn for_index(seed: u64, index: u64) -> Self {
        // SplitMix64 finaliser over the combined key.
        let mut z = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        Self::seeded(z ^ (z >> 31))
    }

    /// Split off a child source with its own state.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.rng.random::<u64>())
    }

    /// Mix the wall-clock time into the stream.
    ///
    /// The next seed still depends on the current state, so two reseeds in the
    /// same clock tick do not collapse onto the same stream.
    pub fn reseed_from_clock(&mut self) {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let next = self.rng.random::<u64>() ^ nanos;
        self.rng = StdRng::seed_from_u64(next);
    }
}

impl RngCore for RandomSource {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
