//! Error types shared by the core modules.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the proximity pipeline.
///
/// None of these are fatal: the monitor absorbs them within the tick that
/// produced them and keeps polling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No location fix yet; the tick is skipped without notification.
    #[error("user location is not known yet")]
    LocationUnavailable,

    /// The reading source could not produce a reading this tick.
    #[error("reading source failed: {0}")]
    ReadingSource(String),

    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}
