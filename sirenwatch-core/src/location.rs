//! User location
//!
//! The proximity monitor never owns the user's position. It asks a
//! [`LocationProvider`] on every tick, so hosts can feed fixes from whatever
//! positioning source they have, at whatever rate it produces them.

use std::sync::{Arc, PoisonError, RwLock};

use crate::geo::Coordinate;

/// Supplies the most recent user position, or `None` before the first fix.
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Option<Coordinate>;
}

impl<F> LocationProvider for F
where
    F: Fn() -> Option<Coordinate> + Send + Sync,
{
    fn current_location(&self) -> Option<Coordinate> {
        self()
    }
}

/// A position fix shared between the host that updates it and the monitor
/// that reads it. Cloning shares the same fix.
#[derive(Debug, Clone, Default)]
pub struct SharedLocation {
    fix: Arc<RwLock<Option<Coordinate>>>,
}

impl SharedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fix(position: Coordinate) -> Self {
        let location = Self::new();
        location.update(position);
        location
    }

    /// Record a new fix
    pub fn update(&self, position: Coordinate) {
        *self.fix.write().unwrap_or_else(PoisonError::into_inner) = Some(position);
    }

    /// Forget the fix, e.g. after the positioning source reports an error
    pub fn clear(&self) {
        *self.fix.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn get(&self) -> Option<Coordinate> {
        *self.fix.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocationProvider for SharedLocation {
    fn current_location(&self) -> Option<Coordinate> {
        self.get()
    }
}
