//! Simulated location receiver
//!
//! Stands in for the device's position watch. Nothing is reported until the
//! session switches location tracking on. The first fix arrives after the
//! receiver's settle delay, then it is re-reported every [`FIX_INTERVAL`].

use std::time::Duration;

use sirenwatch_core::{Coordinate, SharedLocation};
use tokio::sync::watch;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

/// Time between fixes once tracking is on
pub const FIX_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct GpsReceiver {
    location: SharedLocation,
    fix: Coordinate,
    fix_delay: Duration,
}

impl GpsReceiver {
    pub fn new(location: SharedLocation, fix: Coordinate, fix_delay: Duration) -> Self {
        GpsReceiver {
            location,
            fix,
            fix_delay,
        }
    }

    /// Wait for tracking, then keep `location` updated. Returns early only
    /// if the tracking switch goes away before tracking started.
    pub async fn track(self, mut tracking: watch::Receiver<bool>) {
        let started = tracking.wait_for(|on| *on).await.is_ok();
        if !started {
            log::debug!("gps: session closed before tracking started");
            return;
        }

        log::debug!("gps: tracking, waiting {:?} for a fix", self.fix_delay);
        sleep(self.fix_delay).await;
        self.location.update(self.fix);
        log::info!("Location fix: {}", self.fix);

        let mut ticker = interval_at(Instant::now() + FIX_INTERVAL, FIX_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.location.update(self.fix);
            log::trace!("gps: fix refreshed");
        }
    }
}
