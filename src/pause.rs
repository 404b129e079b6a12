// Interaction-driven pause with idle auto-resume.
//
// Two states, `Running` and `Paused`. Gestures pause and restart the idle
// countdown; once the countdown runs out without a newer gesture the timer
// returns to `Running` by itself. At most one deadline is ever pending: every
// re-arm replaces the previous one, and a deadline token that no longer
// matches is ignored when it fires.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(45_000);

/// Monotonic time source. Readings are offsets from an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and headless hosts. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_millis(&self, ms: u64) {
        self.millis.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        let _ = self
            .millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |ms| {
                Some(ms.saturating_add(by))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseState {
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseConfig {
    pub initial_pause_state: bool,
    pub idle_timeout: Duration,
    /// When false, `register_interaction` does nothing
    pub track_interactions: bool,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            initial_pause_state: false,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            track_interactions: true,
        }
    }
}

/// Handle to the single armed auto-resume deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub token: u64,
    pub due: Duration,
}

#[derive(Debug)]
pub struct InteractionPauseTimer<C: Clock> {
    clock: C,
    config: PauseConfig,
    paused: bool,
    last_interaction: Option<Duration>,
    pending: Option<Deadline>,
    next_token: u64,
    disposed: bool,
}

impl<C: Clock> InteractionPauseTimer<C> {
    pub fn new(clock: C, config: PauseConfig) -> Self {
        Self {
            clock,
            config,
            paused: config.initial_pause_state,
            last_interaction: None,
            pending: None,
            next_token: 0,
            disposed: false,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> PauseState {
        if self.paused {
            PauseState::Paused
        } else {
            PauseState::Running
        }
    }

    pub fn last_interaction(&self) -> Option<Duration> {
        self.last_interaction
    }

    pub fn pending_deadline(&self) -> Option<Deadline> {
        self.pending
    }

    pub fn idle_timeout(&self) -> Duration {
        self.config.idle_timeout
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Time left until the pending deadline, zero if already due
    pub fn time_until_resume(&self) -> Option<Duration> {
        self.pending.map(|d| d.due.saturating_sub(self.clock.now()))
    }

    /// A user gesture: pause and restart the idle countdown
    pub fn register_interaction(&mut self) {
        if self.disposed || !self.config.track_interactions {
            return;
        }
        self.enter_paused();
    }

    /// Flip between running and paused. Pausing stamps the interaction time
    /// and arms a deadline exactly like a gesture does.
    pub fn toggle_pause(&mut self) {
        if self.disposed {
            return;
        }
        if self.paused {
            self.paused = false;
            self.cancel_deadline();
            debug!("autoplay resumed by toggle");
        } else {
            self.enter_paused();
        }
    }

    /// Force `Running` and drop any pending deadline. Idempotent.
    pub fn resume_autoplay(&mut self) {
        if self.disposed {
            return;
        }
        if self.paused {
            debug!("autoplay resumed manually");
        }
        self.paused = false;
        self.cancel_deadline();
    }

    /// Fire the pending deadline if its due time has passed.
    /// Returns whether the timer resumed.
    pub fn poll(&mut self) -> bool {
        match self.pending {
            Some(d) if self.clock.now() >= d.due => self.fire(d.token),
            _ => false,
        }
    }

    /// Deadline callback. Stale tokens and early firings change nothing.
    pub fn fire(&mut self, token: u64) -> bool {
        if self.disposed {
            return false;
        }
        let Some(pending) = self.pending else {
            return false;
        };
        if pending.token != token {
            return false;
        }
        let Some(last) = self.last_interaction else {
            return false;
        };

        let elapsed = self.clock.now().saturating_sub(last);
        if !self.paused || elapsed < self.config.idle_timeout {
            return false;
        }

        self.pending = None;
        self.paused = false;
        debug!(idle_ms = elapsed.as_millis() as u64, "autoplay auto-resumed");
        true
    }

    /// Cancel everything; the timer is inert afterwards
    pub fn dispose(&mut self) {
        self.cancel_deadline();
        self.disposed = true;
    }

    fn enter_paused(&mut self) {
        let now = self.clock.now();
        if !self.paused {
            debug!("autoplay paused");
        }
        self.paused = true;
        self.last_interaction = Some(now);
        self.arm(now + self.config.idle_timeout);
    }

    fn arm(&mut self, due: Duration) {
        self.next_token = self.next_token.wrapping_add(1);
        self.pending = Some(Deadline {
            token: self.next_token,
            due,
        });
    }

    fn cancel_deadline(&mut self) {
        self.pending = None;
    }
}

impl<C: Clock> Drop for InteractionPauseTimer<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}
