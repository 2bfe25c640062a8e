//! Reading sources
//!
//! A reading source turns the user's position into a [`ProximityReading`]
//! once per tick. The monitor only sees the trait, so the simulated source
//! used by the demo can be swapped for a real fleet feed
//! ([`FleetReadingSource`](super::FleetReadingSource)) without touching it.

use crate::error::Result;
use crate::geo::Coordinate;

use super::tier::ProximityReading;

/// Pluggable supplier of proximity readings.
pub trait ReadingSource: Send {
    /// Produce the reading for this tick. `user` is the latest location fix.
    fn next_reading(&mut self, user: Coordinate) -> Result<ProximityReading>;
}

impl<F> ReadingSource for F
where
    F: FnMut(Coordinate) -> Result<ProximityReading> + Send,
{
    fn next_reading(&mut self, user: Coordinate) -> Result<ProximityReading> {
        self(user)
    }
}

#[cfg(feature = "simulation")]
pub use simulated::*;

#[cfg(feature = "simulation")]
mod simulated {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::ops::Range;

    use super::*;

    /// Chance that an ambulance is approaching on any given tick
    pub const APPROACH_PROBABILITY: f64 = 0.3;

    /// Simulated distances are drawn uniformly from this range (meters)
    pub const SIMULATED_DISTANCE_M: Range<f64> = 50.0..250.0;

    /// Demo source that invents an ambulance near the user.
    ///
    /// Each tick the ambulance is approaching with probability
    /// [`APPROACH_PROBABILITY`] at a distance in [`SIMULATED_DISTANCE_M`].
    /// The user position is ignored.
    #[derive(Debug, Clone)]
    pub struct SimulatedReadingSource {
        rng: ChaCha8Rng,
    }

    impl SimulatedReadingSource {
        pub fn new() -> Self {
            SimulatedReadingSource {
                rng: ChaCha8Rng::from_entropy(),
            }
        }

        /// Deterministic sequence for tests and replays
        pub fn seeded(seed: u64) -> Self {
            SimulatedReadingSource {
                rng: ChaCha8Rng::seed_from_u64(seed),
            }
        }
    }

    impl Default for SimulatedReadingSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ReadingSource for SimulatedReadingSource {
        fn next_reading(&mut self, _user: Coordinate) -> Result<ProximityReading> {
            let distance_meters = self.rng.gen_range(SIMULATED_DISTANCE_M);
            let approaching = self.rng.gen_bool(APPROACH_PROBABILITY);
            Ok(ProximityReading {
                distance_meters,
                approaching,
            })
        }
    }
}
