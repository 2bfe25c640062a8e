//! Periodic scheduling abstraction
//!
//! The proximity monitor needs exactly one thing from a runtime: "call this
//! every N milliseconds until I cancel". Hosts implement [`Scheduler`] on top
//! of whatever they run (a tokio interval, a UI event loop, a game loop).
//!
//! [`ManualScheduler`] fires tasks only when told to. It is the scheduler for
//! poll-based hosts and for tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// The unit of periodic work handed to a scheduler
pub type Task = Box<dyn FnMut() + Send + 'static>;

/// Runs a task periodically until its handle is cancelled.
pub trait Scheduler {
    type Handle: ScheduleHandle;

    /// Schedule `task` to run every `interval`, first run one interval from now.
    fn schedule_periodic(&self, interval: Duration, task: Task) -> Self::Handle;
}

/// Cancels a periodic schedule.
///
/// After `cancel` returns the scheduler must not *start* another run of the
/// task. A run that is already executing may still complete.
pub trait ScheduleHandle: Send {
    fn cancel(self);
}

struct ManualTask {
    id: u64,
    interval: Duration,
    task: Arc<Mutex<Task>>,
}

/// Scheduler driven by explicit [`fire`](ManualScheduler::fire) calls.
///
/// Clones share the same task list, so a host can keep one clone and hand the
/// other to a monitor.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tasks: Arc<Mutex<Vec<ManualTask>>>,
    next_id: Arc<AtomicU64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every active task once. Returns how many tasks ran.
    ///
    /// The task list lock is not held while tasks run, so a task may be
    /// cancelled from another thread while it executes.
    pub fn fire(&self) -> usize {
        let snapshot: Vec<Arc<Mutex<Task>>> = self
            .lock()
            .iter()
            .map(|t| t.task.clone())
            .collect();

        for task in &snapshot {
            let mut task = task.lock().unwrap_or_else(PoisonError::into_inner);
            (*task)();
        }
        snapshot.len()
    }

    /// Number of schedules that have not been cancelled
    pub fn active(&self) -> usize {
        self.lock().len()
    }

    /// Intervals of the active schedules, in scheduling order
    pub fn intervals(&self) -> Vec<Duration> {
        self.lock().iter().map(|t| t.interval).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ManualTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule_periodic(&self, interval: Duration, task: Task) -> ManualHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(ManualTask {
            id,
            interval,
            task: Arc::new(Mutex::new(task)),
        });
        ManualHandle {
            id,
            tasks: self.tasks.clone(),
        }
    }
}

pub struct ManualHandle {
    id: u64,
    tasks: Arc<Mutex<Vec<ManualTask>>>,
}

impl ScheduleHandle for ManualHandle {
    fn cancel(self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|t| t.id != self.id);
    }
}
