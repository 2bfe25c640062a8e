//! Ambulance Driver State
//!
//! Tracks the emergency and siren toggles of an ambulance driver and produces
//! the location report shared with dispatch. Broadcasting and dispatch are
//! stubs that only log; the session returns [`DriverEvent`]s so the host can
//! drive its audio and display.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Side effects of a driver toggle, in the order they happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverEvent {
    EmergencyActivated,
    EmergencyDeactivated,
    SirenStarted,
    SirenStopped,
    BroadcastStarted,
    BroadcastStopped,
}

/// Emergency and siren state of one driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSession {
    pub emergency_active: bool,
    pub siren_active: bool,
}

/// Position report sent to emergency dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy of the fix in meters
    pub accuracy: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub emergency_active: bool,
    pub siren_active: bool,
}

impl DriverSession {
    pub fn new() -> Self {
        DriverSession::default()
    }

    /// Flip emergency mode.
    ///
    /// Activating starts the siren (if it is off) and the emergency
    /// broadcast. Deactivating stops the siren (if it is on) and the
    /// broadcast.
    pub fn toggle_emergency(&mut self) -> Vec<DriverEvent> {
        self.emergency_active = !self.emergency_active;

        let mut events = Vec::with_capacity(3);
        if self.emergency_active {
            events.push(DriverEvent::EmergencyActivated);
            if !self.siren_active {
                events.push(self.toggle_siren());
            }
            events.push(broadcast_emergency_signal());
        } else {
            events.push(DriverEvent::EmergencyDeactivated);
            if self.siren_active {
                events.push(self.toggle_siren());
            }
            events.push(stop_emergency_broadcast());
        }
        events
    }

    /// Flip the siren independently of emergency mode
    pub fn toggle_siren(&mut self) -> DriverEvent {
        self.siren_active = !self.siren_active;
        if self.siren_active {
            DriverEvent::SirenStarted
        } else {
            DriverEvent::SirenStopped
        }
    }

    /// Build the report for dispatch and "send" it (logged only).
    pub fn share_location(
        &self,
        position: Coordinate,
        accuracy: f64,
        timestamp: u64,
    ) -> LocationReport {
        let report = LocationReport {
            latitude: position.latitude,
            longitude: position.longitude,
            accuracy,
            timestamp,
            emergency_active: self.emergency_active,
            siren_active: self.siren_active,
        };
        match serde_json::to_string(&report) {
            Ok(json) => log::info!("Location shared with dispatch: {}", json),
            Err(e) => log::warn!("Location shared with dispatch (unserializable: {})", e),
        }
        report
    }
}

// Dispatch broadcasting is not implemented; these only record the intent.
fn broadcast_emergency_signal() -> DriverEvent {
    log::info!("Emergency signal broadcasting started");
    DriverEvent::BroadcastStarted
}

fn stop_emergency_broadcast() -> DriverEvent {
    log::info!("Emergency signal broadcasting stopped");
    DriverEvent::BroadcastStopped
}
