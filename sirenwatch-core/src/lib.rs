//! Sirenwatch Core
//!
//! Platform-independent building blocks for the emergency vehicle alert app.
//! Nothing in this crate performs I/O or owns a timer: hosts plug in a
//! [`Scheduler`](scheduler::Scheduler), a [`LocationProvider`] and an
//! [`AlertSink`](proximity::AlertSink), and the core decides when to alert.
//!
//! # Modules
//!
//! - **geo**: coordinates and great-circle distance
//! - **location**: location provider trait and a shared, host-updated fix
//! - **proximity**: alert tiers, reading sources and the proximity monitor
//! - **scheduler**: periodic scheduling abstraction and a manual scheduler
//! - **driver**: emergency/siren state for ambulance drivers
//! - **mode**: driver vs. local-user application mode
//!
//! # Example
//!
//! ```rust,ignore
//! use sirenwatch_core::proximity::{ProximityMonitor, SimulatedReadingSource};
//! use sirenwatch_core::scheduler::ManualScheduler;
//! use sirenwatch_core::{Coordinate, SharedLocation};
//!
//! let location = SharedLocation::new();
//! location.update(Coordinate::new(28.4595, 77.0266)?);
//!
//! let scheduler = ManualScheduler::new();
//! let mut monitor = ProximityMonitor::new(
//!     scheduler.clone(),
//!     location.clone(),
//!     SimulatedReadingSource::seeded(7),
//! );
//! monitor.start(|tier, reading| println!("{:?} at {:.0} m", tier, reading.distance_meters));
//!
//! scheduler.fire(); // one poll tick
//! monitor.stop();
//! ```

pub mod driver;
pub mod error;
pub mod geo;
pub mod location;
pub mod mode;
pub mod proximity;
pub mod scheduler;

pub use error::{Error, Result};
pub use geo::{distance, Coordinate};
pub use location::{LocationProvider, SharedLocation};
pub use mode::AppMode;
