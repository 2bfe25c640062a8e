//! Tokio implementation of Scheduler for the native host.
//!
//! This module provides `TokioScheduler` which implements
//! `sirenwatch_core::scheduler::Scheduler` by running each periodic task in
//! its own tokio task driven by `tokio::time::interval`.
//!
//! Tasks are plain synchronous closures. They run on the runtime's worker
//! threads, so they must stay short (the proximity tick only takes a lock,
//! draws a reading and logs).

use std::time::Duration;

use sirenwatch_core::scheduler::{ScheduleHandle, Scheduler, Task};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Smallest interval accepted; `tokio::time::interval` panics on zero
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Tokio implementation of Scheduler for the native host.
///
/// # Usage
///
/// ```rust,ignore
/// use sirenwatch_core::proximity::ProximityMonitor;
/// use sirenwatch_server::tokio_sched::TokioScheduler;
///
/// // Inside a tokio runtime:
/// let mut monitor = ProximityMonitor::new(TokioScheduler::current(), location, source);
/// monitor.start(sink);
/// ```
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Scheduler on the runtime of the calling context.
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioScheduleHandle;

    fn schedule_periodic(&self, interval: Duration, mut task: Task) -> TokioScheduleHandle {
        let period = interval.max(MIN_INTERVAL);
        let join = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            // A late tick is dropped instead of bursting to catch up
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                task();
            }
        });
        log::trace!("Scheduled periodic task every {:?}", period);
        TokioScheduleHandle { join }
    }
}

/// Aborts the periodic tokio task when cancelled.
pub struct TokioScheduleHandle {
    join: JoinHandle<()>,
}

impl ScheduleHandle for TokioScheduleHandle {
    fn cancel(self) {
        self.join.abort();
    }
}
