//! Geographic coordinates and great-circle distance
//!
//! Distances use the Haversine formula on a spherical Earth with the mean
//! radius [`EARTH_RADIUS_M`]. That is accurate to well under a percent at the
//! city-block scales the proximity monitor cares about.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Zoom level used for navigation links
const MAP_ZOOM: u8 = 15;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Coordinate {
            latitude,
            longitude,
        };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance(*self, *other)
    }

    /// Link that opens a map centred on this position.
    pub fn map_url(&self) -> String {
        format!(
            "https://www.google.com/maps/@{},{},{}z",
            self.latitude, self.longitude, MAP_ZOOM
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Haversine distance between two coordinates in meters.
///
/// The result is symmetric, zero for identical points and never negative.
/// Inputs are not validated: coordinates outside the valid ranges yield an
/// unspecified (but non-panicking) number. Use [`checked_distance`] when the
/// inputs come from an untrusted source.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// [`distance`] with both inputs validated first.
pub fn checked_distance(a: Coordinate, b: Coordinate) -> Result<f64> {
    for c in [a, b] {
        if !c.is_valid() {
            return Err(Error::InvalidCoordinate {
                latitude: c.latitude,
                longitude: c.longitude,
            });
        }
    }
    Ok(distance(a, b))
}
