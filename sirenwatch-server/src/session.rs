//! Application session
//!
//! Owns everything the app used to keep in globals: the current mode, the
//! driver's emergency/siren state, whether proximity alerts are enabled,
//! location tracking, page visibility, and the proximity monitor itself.
//!
//! Location tracking is published on a `watch` channel. The host's location
//! receiver waits on [`AppSession::tracking`] and only starts reporting fixes
//! once tracking is on.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use sirenwatch_core::driver::{DriverEvent, DriverSession, LocationReport};
use sirenwatch_core::proximity::{
    AlertSink, FleetReadingSource, MonitorConfig, MonitorState, ProximityMonitor,
    SimulatedReadingSource, StaticFleet,
};
use sirenwatch_core::scheduler::Scheduler;
use sirenwatch_core::{AppMode, Coordinate, Error, SharedLocation};

/// Where proximity readings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Random ambulance near the user
    #[default]
    Simulated,
    /// Distance to the nearest ambulance of the demo fleet
    Fleet,
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub mode: AppMode,
    pub monitor: MonitorConfig,
    pub source: SourceKind,
    /// Seed for the simulated source; entropy when unset
    pub seed: Option<u64>,
}

/// Session shared between the host's subsystems
pub type SharedSession<S, K> = Arc<Mutex<AppSession<S, K>>>;

/// Serializable snapshot for the `status` command
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub mode: AppMode,
    pub driver: DriverSession,
    pub alerts_enabled: bool,
    pub tracking: bool,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    pub monitor: MonitorState,
}

pub struct AppSession<S: Scheduler, K> {
    mode: AppMode,
    driver: DriverSession,
    alerts_enabled: bool,
    visible: bool,
    tracking: watch::Sender<bool>,
    location: SharedLocation,
    monitor: ProximityMonitor<S>,
    sink: K,
}

impl<S, K> AppSession<S, K>
where
    S: Scheduler,
    K: AlertSink + Clone + 'static,
{
    pub fn new(scheduler: S, location: SharedLocation, sink: K, config: SessionConfig) -> Self {
        let monitor = match config.source {
            SourceKind::Simulated => {
                let source = match config.seed {
                    Some(seed) => SimulatedReadingSource::seeded(seed),
                    None => SimulatedReadingSource::new(),
                };
                ProximityMonitor::with_config(scheduler, location.clone(), source, config.monitor)
            }
            SourceKind::Fleet => ProximityMonitor::with_config(
                scheduler,
                location.clone(),
                FleetReadingSource::new(StaticFleet::demo()),
                config.monitor,
            ),
        };
        log::debug!("Session created with {:?} readings", config.source);
        let (tracking, _) = watch::channel(false);

        let mut session = AppSession {
            mode: AppMode::Driver,
            driver: DriverSession::new(),
            alerts_enabled: false,
            visible: true,
            tracking,
            location,
            monitor,
            sink,
        };
        session.switch_mode(config.mode);
        session
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Switch between driver and local mode. Entering local mode starts
    /// location tracking.
    pub fn switch_mode(&mut self, mode: AppMode) {
        if mode != self.mode {
            log::info!("Switched to {} mode", mode);
        }
        self.mode = mode;
        if mode == AppMode::Local {
            self.start_location_tracking();
        }
    }

    /// Ask the location receiver for fixes. Tracking stays on for the rest
    /// of the session.
    pub fn start_location_tracking(&self) {
        if !self.tracking.send_replace(true) {
            log::debug!("Location tracking started");
        }
    }

    pub fn is_tracking(&self) -> bool {
        *self.tracking.borrow()
    }

    /// Subscribe to the tracking switch
    pub fn tracking(&self) -> watch::Receiver<bool> {
        self.tracking.subscribe()
    }

    pub fn location(&self) -> &SharedLocation {
        &self.location
    }

    pub fn driver(&self) -> &DriverSession {
        &self.driver
    }

    pub fn toggle_emergency(&mut self) -> Vec<DriverEvent> {
        let events = self.driver.toggle_emergency();
        log::info!(
            "Emergency {}",
            if self.driver.emergency_active {
                "ACTIVE"
            } else {
                "INACTIVE"
            }
        );
        events
    }

    pub fn toggle_siren(&mut self) -> DriverEvent {
        let event = self.driver.toggle_siren();
        log::info!("Siren {}", if self.driver.siren_active { "ON" } else { "OFF" });
        event
    }

    /// Share the current fix with dispatch. Without a fix this starts
    /// location tracking so a fix arrives for the next attempt.
    pub fn share_location(&self, accuracy: f64, timestamp_ms: u64) -> Result<LocationReport, Error> {
        let Some(position) = self.location.get() else {
            self.start_location_tracking();
            return Err(Error::LocationUnavailable);
        };
        Ok(self.driver.share_location(position, accuracy, timestamp_ms))
    }

    /// Map link for the current fix. Without a fix this starts location
    /// tracking so a fix arrives for the next attempt.
    pub fn navigation_url(&self) -> Result<String, Error> {
        match self.location.get() {
            Some(position) => Ok(position.map_url()),
            None => {
                self.start_location_tracking();
                Err(Error::LocationUnavailable)
            }
        }
    }

    pub fn alerts_enabled(&self) -> bool {
        self.alerts_enabled
    }

    /// Enable or disable proximity alerts. Returns the new setting.
    pub fn toggle_alerts(&mut self) -> bool {
        self.alerts_enabled = !self.alerts_enabled;
        if self.alerts_enabled {
            self.monitor.start(self.sink.clone());
            log::info!("Proximity alerts ACTIVE");
        } else {
            self.monitor.stop();
            log::info!("Proximity alerts INACTIVE");
        }
        self.alerts_enabled
    }

    /// Host visibility changed. Becoming visible in local mode with alerts
    /// enabled resumes monitoring with a fresh schedule.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            log::info!("App hidden, reducing background activity");
            return;
        }
        log::info!("App visible, resuming normal activity");
        if self.alerts_enabled && self.mode == AppMode::Local && !self.monitor.restart() {
            self.monitor.start(self.sink.clone());
        }
    }

    pub fn monitor(&self) -> &ProximityMonitor<S> {
        &self.monitor
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            mode: self.mode,
            driver: self.driver.clone(),
            alerts_enabled: self.alerts_enabled,
            tracking: self.is_tracking(),
            visible: self.visible,
            location: self.location.get(),
            monitor: self.monitor.state(),
        }
    }

    /// Silence the siren and stop polling before the host exits
    pub fn shutdown(&mut self) {
        if self.driver.siren_active {
            self.toggle_siren();
        }
        if self.monitor.is_running() {
            self.monitor.stop();
        }
        log::debug!("Session shut down");
    }
}
