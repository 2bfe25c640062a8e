//! Native host for the sirenwatch proximity alerts.
//!
//! Runs the [`sirenwatch_core`] monitor on tokio, turns alerts into log lines
//! and takes the app's commands from stdin.

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::time::Duration;

use sirenwatch_core::proximity::{MonitorConfig, NotifyPolicy, DEFAULT_POLL_INTERVAL_MS};
use sirenwatch_core::{AppMode, Coordinate};

pub mod commands;
pub mod gps;
pub mod render;
pub mod session;
pub mod tokio_sched;

use session::{SessionConfig, SourceKind};

/// Demo position used when no location is given
pub const DEMO_LATITUDE: f64 = 28.4595;
pub const DEMO_LONGITUDE: f64 = 77.0266;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Policy {
    /// Notify only when the alert tier changes
    #[default]
    Transition,
    /// Notify on every poll
    Every,
}

impl From<Policy> for NotifyPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Transition => NotifyPolicy::OnTransition,
            Policy::Every => NotifyPolicy::EveryTick,
        }
    }
}

#[derive(Parser, Clone, Debug)]
#[command(version, about = "Emergency vehicle proximity alerts")]
pub struct Cli {
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Start in driver or local mode
    #[arg(long, default_value_t = AppMode::Driver)]
    pub mode: AppMode,

    /// Latitude of the simulated location fix
    #[arg(long, allow_negative_numbers = true, requires = "longitude")]
    pub latitude: Option<f64>,

    /// Longitude of the simulated location fix
    #[arg(long, allow_negative_numbers = true, requires = "latitude")]
    pub longitude: Option<f64>,

    /// Never obtain a location fix
    #[arg(long, conflicts_with_all = ["latitude", "longitude"])]
    pub no_fix: bool,

    /// Time until the location fix arrives
    #[arg(long, default_value_t = 1000)]
    pub fix_delay_ms: u64,

    /// Time between proximity polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// When alerts are reported
    #[arg(long, value_enum, default_value_t = Policy::Transition)]
    pub policy: Policy,

    /// Where proximity readings come from
    #[arg(long, value_enum, default_value_t = SourceKind::Simulated)]
    pub source: SourceKind,

    /// Seed the simulated readings for a repeatable run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable proximity alerts at startup (implies local mode)
    #[arg(long)]
    pub alerts: bool,
}

impl Cli {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            interval_ms: self.interval_ms,
            policy: self.policy.into(),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            mode: if self.alerts { AppMode::Local } else { self.mode },
            monitor: self.monitor_config(),
            source: self.source,
            seed: self.seed,
        }
    }

    /// The location fix the host will report, if any
    pub fn fix(&self) -> Result<Option<Coordinate>, sirenwatch_core::Error> {
        if self.no_fix {
            return Ok(None);
        }
        let latitude = self.latitude.unwrap_or(DEMO_LATITUDE);
        let longitude = self.longitude.unwrap_or(DEMO_LONGITUDE);
        Coordinate::new(latitude, longitude).map(Some)
    }

    pub fn fix_delay(&self) -> Duration {
        Duration::from_millis(self.fix_delay_ms)
    }
}
