//! Proximity monitor
//!
//! While running, the monitor polls on a fixed interval. Each tick reads the
//! user's location, asks the reading source for a [`ProximityReading`],
//! classifies it into an [`AlertTier`] and notifies the sink according to the
//! [`NotifyPolicy`].
//!
//! ```text
//!            start()                  start() (schedule replaced)
//!  STOPPED ----------> RUNNING <-----------------------+
//!     ^                   |  \_________________________/
//!     +-------------------+
//!            stop()
//! ```
//!
//! Ticks never overlap, and once [`stop`](ProximityMonitor::stop) returns no
//! tick notification can reach the sink, even if the scheduler had already
//! started a tick when `stop` was called.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::Error;
use crate::location::LocationProvider;
use crate::scheduler::{ScheduleHandle, Scheduler};

use super::source::ReadingSource;
use super::tier::{AlertTier, ProximityReading};

/// Poll interval used when none is configured
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Receives tier notifications. Implemented for closures.
///
/// The sink runs while the monitor's state is locked, so it must not call
/// back into the monitor that owns it.
pub trait AlertSink: Send {
    fn notify(&mut self, tier: AlertTier, reading: &ProximityReading);
}

impl<F> AlertSink for F
where
    F: FnMut(AlertTier, &ProximityReading) + Send,
{
    fn notify(&mut self, tier: AlertTier, reading: &ProximityReading) {
        self(tier, reading)
    }
}

/// When a successful tick reaches the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Only when the tier differs from the last notified tier
    #[default]
    OnTransition,
    /// On every tick, even when the tier repeats
    EveryTick,
}

impl NotifyPolicy {
    pub fn should_notify(&self, last: AlertTier, current: AlertTier) -> bool {
        match self {
            NotifyPolicy::OnTransition => last != current,
            NotifyPolicy::EveryTick => true,
        }
    }
}

/// Monitor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Time between poll ticks in milliseconds
    pub interval_ms: u64,
    pub policy: NotifyPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            policy: NotifyPolicy::default(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Snapshot of the monitor's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorState {
    pub enabled: bool,
    pub last_tier: AlertTier,
    /// A poll schedule is registered with the scheduler
    pub scheduled: bool,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Monitor stopped, or the tick belongs to a cancelled schedule
    Idle,
    /// Another tick was still running
    Busy,
    /// No reading this tick (unknown location or reading source failure)
    Skipped(Error),
    /// Reading classified, sink not notified
    Unchanged(AlertTier),
    /// Sink notified with this tier
    Notified(AlertTier),
}

struct Inner {
    enabled: bool,
    last_tier: AlertTier,
    /// Bumped on every start/stop; ticks from older schedules are ignored
    generation: u64,
    policy: NotifyPolicy,
    location: Box<dyn LocationProvider>,
    source: Box<dyn ReadingSource>,
    sink: Option<Box<dyn AlertSink>>,
}

impl Inner {
    fn poll(&mut self) -> TickOutcome {
        let Some(user) = self.location.current_location() else {
            log::trace!("Proximity tick skipped, no location fix");
            return TickOutcome::Skipped(Error::LocationUnavailable);
        };

        let reading = match self.source.next_reading(user) {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("Proximity tick at {} failed: {}", user, e);
                return TickOutcome::Skipped(e);
            }
        };

        let tier = AlertTier::classify(&reading);
        log::trace!(
            "Proximity tick at {}: {:.0} m, approaching {} -> {:?}",
            user,
            reading.distance_meters,
            reading.approaching,
            tier
        );

        if !self.policy.should_notify(self.last_tier, tier) {
            return TickOutcome::Unchanged(tier);
        }

        if tier != self.last_tier {
            log::debug!("Alert tier {:?} -> {:?}", self.last_tier, tier);
        }
        self.last_tier = tier;
        if let Some(sink) = self.sink.as_mut() {
            sink.notify(tier, &reading);
        }
        TickOutcome::Notified(tier)
    }

    /// Disable and invalidate any outstanding schedule
    fn disable(&mut self) {
        self.enabled = false;
        self.generation += 1;
        self.last_tier = AlertTier::None;
    }
}

struct Shared {
    inner: Mutex<Inner>,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one tick. `generation` pins the tick to the schedule that fired
    /// it; `None` runs against whatever schedule is current.
    fn tick(&self, generation: Option<u64>) -> TickOutcome {
        if self.busy.swap(true, Ordering::Acquire) {
            log::trace!("Previous proximity tick still running, skipping");
            return TickOutcome::Busy;
        }
        let _busy = BusyGuard(&self.busy);

        let mut inner = self.lock();
        if !inner.enabled || generation.is_some_and(|g| g != inner.generation) {
            return TickOutcome::Idle;
        }
        inner.poll()
    }
}

/// Periodically classifies proximity readings and notifies an [`AlertSink`].
pub struct ProximityMonitor<S: Scheduler> {
    scheduler: S,
    interval: Duration,
    shared: Arc<Shared>,
    handle: Option<S::Handle>,
}

impl<S: Scheduler> ProximityMonitor<S> {
    /// Create a stopped monitor with the default configuration
    pub fn new(
        scheduler: S,
        location: impl LocationProvider + 'static,
        source: impl ReadingSource + 'static,
    ) -> Self {
        Self::with_config(scheduler, location, source, MonitorConfig::default())
    }

    pub fn with_config(
        scheduler: S,
        location: impl LocationProvider + 'static,
        source: impl ReadingSource + 'static,
        config: MonitorConfig,
    ) -> Self {
        let inner = Inner {
            enabled: false,
            last_tier: AlertTier::None,
            generation: 0,
            policy: config.policy,
            location: Box::new(location),
            source: Box::new(source),
            sink: None,
        };
        ProximityMonitor {
            scheduler,
            interval: config.interval(),
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                busy: AtomicBool::new(false),
            }),
            handle: None,
        }
    }

    /// Start polling and deliver tier notifications to `sink`.
    ///
    /// Starting a running monitor stops it first (including its cleared
    /// notification to the previous sink), so there is never more than one
    /// poll schedule.
    pub fn start(&mut self, sink: impl AlertSink + 'static) {
        if self.is_running() || self.handle.is_some() {
            self.stop();
        }

        let generation = {
            let mut inner = self.shared.lock();
            inner.enabled = true;
            inner.last_tier = AlertTier::None;
            inner.generation += 1;
            inner.sink = Some(Box::new(sink));
            inner.generation
        };

        self.schedule(generation);
        log::debug!("Proximity monitoring started, polling every {:?}", self.interval);
    }

    /// Stop polling, reset the tier and send a cleared notification
    /// (`AlertTier::None` with [`ProximityReading::CLEARED`]) so observers
    /// can reset their display.
    ///
    /// Waits for a tick that is already running. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
            log::debug!("Proximity monitoring stopped");
        }

        let mut inner = self.shared.lock();
        inner.disable();
        if let Some(sink) = inner.sink.as_mut() {
            sink.notify(AlertTier::None, &ProximityReading::CLEARED);
        }
    }

    /// Replace the poll schedule of a running monitor, keeping its sink and
    /// tier. Returns false if the monitor is not running.
    pub fn restart(&mut self) -> bool {
        let generation = {
            let mut inner = self.shared.lock();
            if !inner.enabled {
                return false;
            }
            inner.generation += 1;
            inner.generation
        };
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.schedule(generation);
        log::debug!("Proximity monitoring resumed");
        true
    }

    /// Run a tick immediately, outside the schedule
    pub fn poll(&self) -> TickOutcome {
        self.shared.tick(None)
    }

    /// Swap the reading source, e.g. when a real fleet feed becomes available
    pub fn set_source(&self, source: impl ReadingSource + 'static) {
        self.shared.lock().source = Box::new(source);
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().enabled
    }

    pub fn last_tier(&self) -> AlertTier {
        self.shared.lock().last_tier
    }

    pub fn state(&self) -> MonitorState {
        let inner = self.shared.lock();
        MonitorState {
            enabled: inner.enabled,
            last_tier: inner.last_tier,
            scheduled: self.handle.is_some(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn schedule(&mut self, generation: u64) {
        let shared = Arc::clone(&self.shared);
        let handle = self.scheduler.schedule_periodic(
            self.interval,
            Box::new(move || {
                shared.tick(Some(generation));
            }),
        );
        self.handle = Some(handle);
    }
}

impl<S: Scheduler> Drop for ProximityMonitor<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.shared.lock().disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::location::SharedLocation;
    use crate::scheduler::{ManualScheduler, Task};
    use std::sync::mpsc;
    use std::thread;

    type Events = Arc<Mutex<Vec<(AlertTier, ProximityReading)>>>;

    fn recorder() -> (Events, impl AlertSink + 'static) {
        let events: Events = Arc::new(Mutex::new(Vec::new()));
        let sink_events = events.clone();
        let sink = move |tier: AlertTier, reading: &ProximityReading| {
            sink_events.lock().unwrap().push((tier, *reading));
        };
        (events, sink)
    }

    fn here() -> Coordinate {
        Coordinate::new(28.4595, 77.0266).unwrap()
    }

    /// Source that replays a script, then repeats the last entry
    fn scripted(script: Vec<crate::Result<ProximityReading>>) -> impl ReadingSource {
        let mut index = 0;
        move |_: Coordinate| {
            let reading = script[index.min(script.len() - 1)].clone();
            index += 1;
            reading
        }
    }

    fn every_tick() -> MonitorConfig {
        MonitorConfig {
            policy: NotifyPolicy::EveryTick,
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_initial_state_is_stopped() {
        let monitor = ProximityMonitor::new(
            ManualScheduler::new(),
            SharedLocation::new(),
            scripted(vec![Ok(ProximityReading::new(80.0, true))]),
        );
        assert_eq!(
            monitor.state(),
            MonitorState {
                enabled: false,
                last_tier: AlertTier::None,
                scheduled: false,
            }
        );
        assert_eq!(monitor.poll(), TickOutcome::Idle);
    }

    #[test]
    fn test_start_schedules_one_poll_at_two_seconds() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::new(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(80.0, true))]),
        );
        let (events, sink) = recorder();

        monitor.start(sink);

        assert!(monitor.is_running());
        assert!(monitor.state().scheduled);
        assert_eq!(scheduler.intervals(), vec![Duration::from_millis(2000)]);

        scheduler.fire();
        assert_eq!(
            *events.lock().unwrap(),
            vec![(AlertTier::Approaching, ProximityReading::new(80.0, true))]
        );
        assert_eq!(monitor.last_tier(), AlertTier::Approaching);
    }

    #[test]
    fn test_double_start_keeps_one_schedule() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::with_config(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(150.0, true))]),
            every_tick(),
        );
        let (first, first_sink) = recorder();
        let (second, second_sink) = recorder();

        monitor.start(first_sink);
        monitor.start(second_sink);
        assert_eq!(scheduler.active(), 1);

        for _ in 0..3 {
            scheduler.fire();
        }

        // the first sink only saw the cleared notification of the restart
        assert_eq!(
            *first.lock().unwrap(),
            vec![(AlertTier::None, ProximityReading::CLEARED)]
        );
        // exactly one notification per tick
        assert_eq!(second.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_stop_clears_state_and_notifies() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::new(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(80.0, true))]),
        );
        let (events, sink) = recorder();

        monitor.start(sink);
        scheduler.fire();
        monitor.stop();

        assert_eq!(scheduler.active(), 0);
        assert_eq!(
            monitor.state(),
            MonitorState {
                enabled: false,
                last_tier: AlertTier::None,
                scheduled: false,
            }
        );
        assert_eq!(
            events.lock().unwrap().last(),
            Some(&(AlertTier::None, ProximityReading::CLEARED))
        );

        scheduler.fire();
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::new(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(80.0, true))]),
        );

        // never started: nothing to notify, nothing to cancel
        monitor.stop();

        let (events, sink) = recorder();
        monitor.start(sink);
        monitor.stop();
        monitor.stop();

        assert!(!monitor.is_running());
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|(tier, _)| *tier == AlertTier::None));
    }

    #[test]
    fn test_unknown_location_is_a_silent_tick() {
        let scheduler = ManualScheduler::new();
        let location = SharedLocation::with_fix(here());
        let mut monitor = ProximityMonitor::new(
            scheduler.clone(),
            location.clone(),
            scripted(vec![Ok(ProximityReading::new(80.0, true))]),
        );
        let (events, sink) = recorder();

        monitor.start(sink);
        scheduler.fire();
        assert_eq!(monitor.last_tier(), AlertTier::Approaching);

        location.clear();
        assert_eq!(
            monitor.poll(),
            TickOutcome::Skipped(Error::LocationUnavailable)
        );
        scheduler.fire();

        assert_eq!(events.lock().unwrap().len(), 1);
        assert_eq!(monitor.last_tier(), AlertTier::Approaching);
    }

    #[test]
    fn test_source_failure_keeps_polling() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::new(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![
                Err(Error::ReadingSource("feed offline".to_string())),
                Err(Error::ReadingSource("feed offline".to_string())),
                Ok(ProximityReading::new(120.0, true)),
            ]),
        );
        let (events, sink) = recorder();

        monitor.start(sink);
        assert_eq!(
            monitor.poll(),
            TickOutcome::Skipped(Error::ReadingSource("feed offline".to_string()))
        );
        scheduler.fire();
        assert!(events.lock().unwrap().is_empty());
        assert!(monitor.is_running());
        assert_eq!(scheduler.active(), 1);

        scheduler.fire();
        assert_eq!(
            *events.lock().unwrap(),
            vec![(AlertTier::Nearby, ProximityReading::new(120.0, true))]
        );
    }

    #[test]
    fn test_source_failure_keeps_last_alert() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::new(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![
                Ok(ProximityReading::new(70.0, true)),
                Err(Error::ReadingSource("feed offline".to_string())),
                Err(Error::ReadingSource("feed offline".to_string())),
                Ok(ProximityReading::new(65.0, true)),
            ]),
        );
        let (events, sink) = recorder();
        monitor.start(sink);

        assert_eq!(monitor.poll(), TickOutcome::Notified(AlertTier::Approaching));
        assert_eq!(
            monitor.poll(),
            TickOutcome::Skipped(Error::ReadingSource("feed offline".to_string()))
        );
        scheduler.fire();
        assert_eq!(monitor.last_tier(), AlertTier::Approaching);
        assert_eq!(events.lock().unwrap().len(), 1);

        // recovery at the same tier is not a transition
        assert_eq!(monitor.poll(), TickOutcome::Unchanged(AlertTier::Approaching));
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_on_transition_suppresses_repeats() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::new(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![
                Ok(ProximityReading::new(200.0, false)),
                Ok(ProximityReading::new(180.0, true)),
                Ok(ProximityReading::new(160.0, true)),
                Ok(ProximityReading::new(90.0, true)),
                Ok(ProximityReading::new(70.0, true)),
                Ok(ProximityReading::new(70.0, false)),
            ]),
        );
        let (events, sink) = recorder();
        monitor.start(sink);

        let outcomes: Vec<TickOutcome> = (0..6).map(|_| monitor.poll()).collect();
        assert_eq!(
            outcomes,
            vec![
                TickOutcome::Unchanged(AlertTier::None),
                TickOutcome::Notified(AlertTier::Nearby),
                TickOutcome::Unchanged(AlertTier::Nearby),
                TickOutcome::Notified(AlertTier::Approaching),
                TickOutcome::Unchanged(AlertTier::Approaching),
                TickOutcome::Notified(AlertTier::None),
            ]
        );
        let tiers: Vec<AlertTier> = events.lock().unwrap().iter().map(|e| e.0).collect();
        assert_eq!(
            tiers,
            vec![AlertTier::Nearby, AlertTier::Approaching, AlertTier::None]
        );
    }

    #[test]
    fn test_every_tick_renotifies() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::with_config(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(60.0, true))]),
            every_tick(),
        );
        let (events, sink) = recorder();
        monitor.start(sink);

        for _ in 0..4 {
            scheduler.fire();
        }
        assert_eq!(events.lock().unwrap().len(), 4);
    }

    /// Scheduler that never cancels, like a runtime that already queued the
    /// next run when the handle was dropped
    #[derive(Clone, Default)]
    struct LeakyScheduler {
        tasks: Arc<Mutex<Vec<Task>>>,
    }

    struct LeakyHandle;

    impl ScheduleHandle for LeakyHandle {
        fn cancel(self) {}
    }

    impl Scheduler for LeakyScheduler {
        type Handle = LeakyHandle;

        fn schedule_periodic(&self, _interval: Duration, task: Task) -> LeakyHandle {
            self.tasks.lock().unwrap().push(task);
            LeakyHandle
        }
    }

    #[test]
    fn test_stale_schedule_cannot_notify_after_stop() {
        let scheduler = LeakyScheduler::default();
        let mut monitor = ProximityMonitor::with_config(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(60.0, true))]),
            every_tick(),
        );
        let (events, sink) = recorder();

        monitor.start(sink);
        monitor.stop();
        let after_stop = events.lock().unwrap().len();

        for task in scheduler.tasks.lock().unwrap().iter_mut() {
            task();
        }
        assert_eq!(events.lock().unwrap().len(), after_stop);

        // a restart must not revive the old schedule either
        let (restarted, sink) = recorder();
        monitor.start(sink);
        for task in scheduler.tasks.lock().unwrap().iter_mut() {
            task();
        }
        assert_eq!(restarted.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_stop_waits_for_in_flight_tick() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::with_config(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(60.0, true))]),
            every_tick(),
        );

        let (in_flight_tx, in_flight_rx) = mpsc::channel();
        let events: Events = Arc::new(Mutex::new(Vec::new()));
        let sink_events = events.clone();
        let mut calls = 0;
        monitor.start(move |tier: AlertTier, reading: &ProximityReading| {
            calls += 1;
            if calls == 1 {
                in_flight_tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(100));
            }
            sink_events.lock().unwrap().push((tier, *reading));
        });

        let host = scheduler.clone();
        let ticker = thread::spawn(move || host.fire());

        in_flight_rx.recv().unwrap();
        // overlapping ticks are dropped, not queued
        assert_eq!(monitor.poll(), TickOutcome::Busy);

        monitor.stop();
        let at_stop = events.lock().unwrap().clone();
        ticker.join().unwrap();

        assert_eq!(
            at_stop,
            vec![
                (AlertTier::Approaching, ProximityReading::new(60.0, true)),
                (AlertTier::None, ProximityReading::CLEARED),
            ]
        );

        scheduler.fire();
        assert_eq!(monitor.poll(), TickOutcome::Idle);
        assert_eq!(*events.lock().unwrap(), at_stop);
    }

    #[test]
    fn test_restart_replaces_schedule_and_keeps_sink() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::with_config(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(60.0, true))]),
            every_tick(),
        );
        assert!(!monitor.restart());

        let (events, sink) = recorder();
        monitor.start(sink);
        assert!(monitor.restart());
        assert_eq!(scheduler.active(), 1);

        scheduler.fire();
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_drop_cancels_schedule_without_notifying() {
        let scheduler = ManualScheduler::new();
        let (events, sink) = recorder();
        {
            let mut monitor = ProximityMonitor::new(
                scheduler.clone(),
                SharedLocation::with_fix(here()),
                scripted(vec![Ok(ProximityReading::new(60.0, true))]),
            );
            monitor.start(sink);
        }
        assert_eq!(scheduler.active(), 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_set_source_swaps_readings() {
        let scheduler = ManualScheduler::new();
        let mut monitor = ProximityMonitor::new(
            scheduler.clone(),
            SharedLocation::with_fix(here()),
            scripted(vec![Ok(ProximityReading::new(200.0, false))]),
        );
        let (events, sink) = recorder();
        monitor.start(sink);

        assert_eq!(monitor.poll(), TickOutcome::Unchanged(AlertTier::None));
        monitor.set_source(scripted(vec![Ok(ProximityReading::new(40.0, true))]));
        assert_eq!(monitor.poll(), TickOutcome::Notified(AlertTier::Approaching));
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[cfg(feature = "simulation")]
    #[test]
    fn test_simulated_notifications_match_classification() {
        use crate::proximity::SimulatedReadingSource;

        for policy in [NotifyPolicy::EveryTick, NotifyPolicy::OnTransition] {
            let scheduler = ManualScheduler::new();
            let mut monitor = ProximityMonitor::with_config(
                scheduler.clone(),
                SharedLocation::with_fix(here()),
                SimulatedReadingSource::seeded(2024),
                MonitorConfig {
                    interval_ms: 2000,
                    policy,
                },
            );
            let (events, sink) = recorder();
            monitor.start(sink);

            for _ in 0..60 {
                scheduler.fire();
            }

            let events = events.lock().unwrap();
            assert!(events.len() >= 5, "{:?}: only {} events", policy, events.len());
            for (tier, reading) in events.iter() {
                assert_eq!(*tier, AlertTier::classify(reading));
                assert!((50.0..250.0).contains(&reading.distance_meters));
            }
        }
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: MonitorConfig = serde_json::from_str(r#"{"policy":"every_tick"}"#).unwrap();
        assert_eq!(config.interval_ms, 2000);
        assert_eq!(config.policy, NotifyPolicy::EveryTick);
        assert_eq!(config.interval(), Duration::from_secs(2));
    }
}
