//! Seeding for the trade-order shuffle.
//!
//! One master seed per run. Simulation `i` shuffles with a generator seeded
//! from `BLAKE3(master ‖ stream ‖ i)`, so curve `i` is a pure function of the
//! master seed and its index. Worker count and scheduling never change a curve.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Stream label used by the trade-order shuffle.
pub const SHUFFLE_STREAM: &str = "shuffle";

/// Master seed plus per-simulation generator derivation.
///
/// Store [`master_seed`](Self::master_seed) with a report and the same curves
/// can be regenerated later, on any number of threads.
#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Hierarchy seeded from OS entropy. Read the seed back with
    /// [`master_seed`](Self::master_seed) to reproduce the run.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// 64-bit seed for simulation `iteration` of `stream`: the first eight
    /// bytes of the BLAKE3 digest, little-endian.
    pub fn sub_seed(&self, stream: &str, iteration: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(stream.as_bytes());
        hasher.update(&iteration.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Generator for one simulation's shuffle.
    pub fn rng_for(&self, stream: &str, iteration: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(stream, iteration))
    }
}
