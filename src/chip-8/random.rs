use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random bytes consumed by `CXKK`. Nothing else draws entropy.
pub trait RandomNumberProvider {
    fn next_byte(&mut self) -> u8;

    /// Called when the machine is reset to its power-on state.
    fn reseed(&mut self) {}
}

/// Uniform bytes from [`StdRng`], seeded from the wall clock.
pub struct WallClockRng {
    rng: StdRng,
}

impl WallClockRng {
    pub fn new() -> Self {
        Self {
            rng: StdRng::seed_from_u64(wall_clock_seed()),
        }
    }
}

impl Default for WallClockRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomNumberProvider for WallClockRng {
    fn next_byte(&mut self) -> u8 {
        self.rng.gen()
    }

    fn reseed(&mut self) {
        self.rng = StdRng::seed_from_u64(wall_clock_seed());
    }
}

fn wall_clock_seed() -> u64 {
    // A clock before the epoch still yields a usable, if poor, seed.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
