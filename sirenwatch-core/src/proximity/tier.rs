//! Alert tiers and their classification from proximity readings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this distance an approaching ambulance raises the top-tier alert.
pub const APPROACHING_THRESHOLD_M: f64 = 100.0;

/// One proximity sample taken during a poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityReading {
    /// Distance to the ambulance in meters
    pub distance_meters: f64,
    /// Whether the ambulance is closing in on the user
    pub approaching: bool,
}

impl ProximityReading {
    /// The reading attached to the "cleared" notification sent on stop.
    /// Only `approaching == false` is meaningful; the distance is zero.
    pub const CLEARED: ProximityReading = ProximityReading {
        distance_meters: 0.0,
        approaching: false,
    };

    pub fn new(distance_meters: f64, approaching: bool) -> Self {
        ProximityReading {
            distance_meters,
            approaching,
        }
    }

    pub fn tier(&self) -> AlertTier {
        AlertTier::classify(self)
    }
}

/// Severity of a proximity alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTier {
    /// No emergency vehicle nearby
    #[default]
    None,
    /// An ambulance is approaching but still at least 100 m away
    Nearby,
    /// An ambulance is approaching and closer than 100 m
    Approaching,
}

impl AlertTier {
    /// Classify a reading.
    ///
    /// | approaching | distance  | tier        |
    /// |-------------|-----------|-------------|
    /// | false       | any       | None        |
    /// | true        | < 100 m   | Approaching |
    /// | true        | >= 100 m  | Nearby      |
    pub fn classify(reading: &ProximityReading) -> AlertTier {
        if !reading.approaching {
            AlertTier::None
        } else if reading.distance_meters < APPROACHING_THRESHOLD_M {
            AlertTier::Approaching
        } else {
            AlertTier::Nearby
        }
    }

    /// Whether the host should surface a visible alert for this tier
    pub fn is_alert(&self) -> bool {
        *self != AlertTier::None
    }
}

impl fmt::Display for AlertTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            AlertTier::None => "No Emergency Vehicles Nearby",
            AlertTier::Nearby => "AMBULANCE NEARBY",
            AlertTier::Approaching => "AMBULANCE APPROACHING",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_and_approaching() {
        let reading = ProximityReading::new(80.0, true);
        assert_eq!(AlertTier::classify(&reading), AlertTier::Approaching);
    }

    #[test]
    fn test_far_and_approaching() {
        let reading = ProximityReading::new(150.0, true);
        assert_eq!(AlertTier::classify(&reading), AlertTier::Nearby);
    }

    #[test]
    fn test_not_approaching_is_none() {
        assert_eq!(ProximityReading::new(150.0, false).tier(), AlertTier::None);
        // distance is irrelevant when the vehicle is not approaching
        assert_eq!(ProximityReading::new(10.0, false).tier(), AlertTier::None);
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(ProximityReading::new(99.999, true).tier(), AlertTier::Approaching);
        assert_eq!(ProximityReading::new(100.0, true).tier(), AlertTier::Nearby);
    }

    #[test]
    fn test_cleared_reading_is_none() {
        assert_eq!(ProximityReading::CLEARED.tier(), AlertTier::None);
        assert!(!AlertTier::None.is_alert());
        assert!(AlertTier::Nearby.is_alert());
    }

    #[test]
    fn test_reading_serializes_camel_case() {
        let json = serde_json::to_string(&ProximityReading::new(120.0, true)).unwrap();
        assert_eq!(json, r#"{"distanceMeters":120.0,"approaching":true}"#);
        assert_eq!(
            serde_json::to_string(&AlertTier::Approaching).unwrap(),
            "\"approaching\""
        );
    }
}
