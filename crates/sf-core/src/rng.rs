//! Deterministic simulation-level RNG.
//!
//! Simulation logic itself is deterministic and draws no randomness.  `SimRng`
//! exists for scenario construction (initial plane placement, task arrival
//! locations) so that a run is fully reproducible from `SimConfig::seed`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Point;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG for scenario generation.
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset, useful for
    /// giving independent streams to, e.g., placement and task arrivals.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform point in the axis-aligned square `[0, side) × [0, side)`.
    pub fn point_in_square(&mut self, side: f64) -> Point {
        Point::new(self.0.gen_range(0.0..side), self.0.gen_range(0.0..side))
    }
}
