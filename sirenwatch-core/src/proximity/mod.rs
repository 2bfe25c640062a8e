//! Ambulance Proximity Alerting
//!
//! This module decides when a local road user should be warned about an
//! approaching ambulance.
//!
//! # Features
//!
//! - Three alert tiers derived from a proximity reading
//! - Pluggable reading sources (simulated demo source, fleet feed)
//! - A scheduler-agnostic monitor with start/stop/restart semantics
//!
//! # Example
//!
//! ```rust,ignore
//! use sirenwatch_core::proximity::{
//!     FleetReadingSource, MonitorConfig, NotifyPolicy, ProximityMonitor, StaticFleet,
//! };
//!
//! let mut monitor = ProximityMonitor::with_config(
//!     scheduler,
//!     location,
//!     FleetReadingSource::new(StaticFleet::demo()),
//!     MonitorConfig { interval_ms: 2000, policy: NotifyPolicy::OnTransition },
//! );
//!
//! monitor.start(|tier, reading| {
//!     if tier.is_alert() {
//!         show_alert(tier, reading.distance_meters);
//!     } else {
//!         hide_alert();
//!     }
//! });
//! ```

mod fleet;
mod monitor;
mod source;
mod tier;

pub use fleet::{Ambulance, FleetFeed, FleetReadingSource, StaticFleet};
pub use monitor::{
    AlertSink, MonitorConfig, MonitorState, NotifyPolicy, ProximityMonitor, TickOutcome,
    DEFAULT_POLL_INTERVAL_MS,
};
pub use source::*;
pub use tier::{AlertTier, ProximityReading, APPROACHING_THRESHOLD_M};
