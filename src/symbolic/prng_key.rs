//! Explicit, immutable handle to a pseudo-random stream.
//!
//! A key never mutates: `split` returns two fresh keys, and every draw made with the same
//! key restarts the same underlying stream. Drawing twice with one key therefore gives
//! correlated results; the generator relies on that when it reuses one subkey per addend.
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const SPLIT_TWEAK: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PRNGKey {
    state: u64,
}

impl PRNGKey {
    pub fn new(seed: u64) -> Self {
        PRNGKey { state: seed }
    }

    /// (next key, subkey)
    pub fn split(self) -> (PRNGKey, PRNGKey) {
        let mut rng = StdRng::seed_from_u64(self.state ^ SPLIT_TWEAK);
        let next = PRNGKey {
            state: rng.next_u64(),
        };
        let subkey = PRNGKey {
            state: rng.next_u64(),
        };
        (next, subkey)
    }

    /// `n` integers drawn uniformly from [minval, maxval)
    pub fn randint(&self, n: usize, minval: usize, maxval: usize) -> Vec<usize> {
        debug_assert!(minval < maxval, "empty range [{}, {})", minval, maxval);
        let mut rng = StdRng::seed_from_u64(self.state);
        (0..n).map(|_| rng.random_range(minval..maxval)).collect()
    }
}
