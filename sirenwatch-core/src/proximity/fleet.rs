//! Fleet-based reading source
//!
//! Computes real proximity readings from ambulance positions: the reading is
//! the great-circle distance to the nearest ambulance, and the ambulance is
//! considered approaching when that distance shrank since the previous tick.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geo::Coordinate;

use super::source::ReadingSource;
use super::tier::ProximityReading;

/// Last reported position of one ambulance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ambulance {
    pub id: String,
    pub position: Coordinate,
}

impl Ambulance {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Ambulance {
            id: id.into(),
            position: Coordinate {
                latitude,
                longitude,
            },
        }
    }
}

/// Supplier of current ambulance positions.
pub trait FleetFeed: Send {
    fn ambulances(&mut self) -> Result<Vec<Ambulance>>;
}

/// A fixed fleet, e.g. for demos or replaying a recorded snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticFleet {
    pub ambulances: Vec<Ambulance>,
}

impl StaticFleet {
    pub fn new(ambulances: Vec<Ambulance>) -> Self {
        StaticFleet { ambulances }
    }

    /// The two demo ambulances parked in Gurugram
    pub fn demo() -> Self {
        StaticFleet::new(vec![
            Ambulance::new("amb1", 28.4595, 77.0266),
            Ambulance::new("amb2", 28.4605, 77.0276),
        ])
    }
}

impl FleetFeed for StaticFleet {
    fn ambulances(&mut self) -> Result<Vec<Ambulance>> {
        Ok(self.ambulances.clone())
    }
}

/// Reading source backed by a [`FleetFeed`].
pub struct FleetReadingSource<F> {
    feed: F,
    /// Distance to each ambulance at the previous tick
    previous: HashMap<String, f64>,
}

impl<F: FleetFeed> FleetReadingSource<F> {
    pub fn new(feed: F) -> Self {
        FleetReadingSource {
            feed,
            previous: HashMap::new(),
        }
    }
}

impl<F: FleetFeed> ReadingSource for FleetReadingSource<F> {
    fn next_reading(&mut self, user: Coordinate) -> Result<ProximityReading> {
        let fleet = self.feed.ambulances()?;

        let distances: HashMap<String, f64> = fleet
            .into_iter()
            .map(|a| {
                let d = user.distance_to(&a.position);
                (a.id, d)
            })
            .collect();

        let nearest = distances
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(id, d)| (id.clone(), *d));

        let Some((id, distance_meters)) = nearest else {
            self.previous.clear();
            return Err(Error::ReadingSource("no ambulances reported".to_string()));
        };

        let approaching = self
            .previous
            .get(&id)
            .is_some_and(|&before| distance_meters < before);

        log::trace!(
            "Nearest ambulance {} at {:.0} m (approaching: {})",
            id,
            distance_meters,
            approaching
        );

        self.previous = distances;
        Ok(ProximityReading {
            distance_meters,
            approaching,
        })
    }
}
