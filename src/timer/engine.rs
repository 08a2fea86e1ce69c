//! Session timer engine

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info};

use super::session::{validate_duration, validate_subject, StudySession};
use crate::{
    error::ValidationError,
    state::{TimerState, TimerStatus},
    tasks::tick_task,
};

/// Default time between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct TimerInner {
    state: TimerState,
    /// Bumped on every transition out of Running. A tick only counts if it
    /// carries the current generation.
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl TimerInner {
    /// Stop the tick task. Any tick already in flight is voided by the
    /// generation bump before it can take the lock.
    fn halt(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

#[derive(Debug)]
struct Shared {
    inner: Mutex<TimerInner>,
    updates: watch::Sender<TimerState>,
}

impl Shared {
    // The state is a handful of plain values, still usable after a panic.
    fn lock(&self) -> MutexGuard<'_, TimerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &TimerInner) -> TimerState {
        let snapshot = inner.state.clone();
        self.updates.send_replace(snapshot.clone());
        snapshot
    }

    /// Apply one tick. Returns `false` once the tick source is stale.
    fn tick(&self, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation || !inner.state.is_running() {
            return false;
        }
        inner.state.elapsed_seconds += 1;
        self.publish(&inner);
        true
    }
}

/// Stopwatch for a single study session.
///
/// Owns at most one tick task at a time. `start` must be called from within
/// a tokio runtime.
#[derive(Debug)]
pub struct TimerEngine {
    shared: Arc<Shared>,
    tick_period: Duration,
}

impl TimerEngine {
    pub fn new(tick_period: Duration) -> Self {
        let (updates, _) = watch::channel(TimerState::new());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(TimerInner::default()),
                updates,
            }),
            tick_period,
        }
    }

    /// Current timer snapshot
    pub fn state(&self) -> TimerState {
        self.shared.lock().state.clone()
    }

    /// Watch every change, including each tick
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.updates.subscribe()
    }

    /// Start or resume tracking.
    ///
    /// Already running: the subject is still checked but nothing else
    /// changes, so no second tick source is ever created.
    pub fn start(&self, subject: &str, topic: Option<&str>) -> Result<TimerState, ValidationError> {
        validate_subject(subject)?;

        let mut inner = self.shared.lock();
        if inner.state.is_running() {
            debug!("Timer already running, ignoring start");
            return Ok(inner.state.clone());
        }

        inner.state.subject = Some(subject.trim().to_string());
        inner.state.topic = topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        inner.state.status = TimerStatus::Running;

        inner.generation += 1;
        let generation = inner.generation;
        let shared = Arc::clone(&self.shared);
        inner.ticker = Some(tokio::spawn(tick_task(self.tick_period, move || {
            shared.tick(generation)
        })));

        info!(
            "Timer started: subject={}, elapsed={}s",
            subject.trim(),
            inner.state.elapsed_seconds
        );
        Ok(self.shared.publish(&inner))
    }

    /// Pause a running timer. No-op in any other state.
    pub fn pause(&self) -> TimerState {
        let mut inner = self.shared.lock();
        if !inner.state.is_running() {
            debug!("Timer not running, ignoring pause");
            return inner.state.clone();
        }

        inner.halt();
        inner.state.status = TimerStatus::Paused;
        info!("Timer paused at {}s", inner.state.elapsed_seconds);
        self.shared.publish(&inner)
    }

    /// Stop tracking and zero the counter. The subject selection is kept.
    pub fn reset(&self) -> TimerState {
        let mut inner = self.shared.lock();
        Self::reset_locked(&mut inner);
        self.shared.publish(&inner)
    }

    /// Finish the session and return it, leaving the timer idle.
    ///
    /// Fails without touching the timer when less than a minute has elapsed.
    pub fn save(&self) -> Result<StudySession, ValidationError> {
        let mut inner = self.shared.lock();
        validate_duration(inner.state.elapsed_seconds)?;

        let subject = inner.state.subject.clone().unwrap_or_default();
        let session = StudySession::new(
            &subject,
            inner.state.topic.as_deref(),
            inner.state.elapsed_seconds,
        )?;

        Self::reset_locked(&mut inner);
        self.shared.publish(&inner);

        info!("Study session saved: {}", session.summary());
        Ok(session)
    }

    fn reset_locked(inner: &mut TimerInner) {
        inner.halt();
        if !inner.state.is_idle() || inner.state.elapsed_seconds != 0 {
            debug!("Timer reset from {}s", inner.state.elapsed_seconds);
        }
        inner.state.status = TimerStatus::Idle;
        inner.state.elapsed_seconds = 0;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.shared.lock().halt();
    }
}
