//! Drift-corrected countdown.
//!
//! The remaining budget is always derived from the clock reading taken when
//! the countdown was (re)started, never from the number of polls, so jitter
//! between polls does not accumulate. Cancelling or pausing freezes the
//! budget; a cancelled countdown drops its callback and can never fire it.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::timer::clock::Clock;

type Callback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    Cancelled,
    Expired,
}

pub struct Countdown {
    clock: Arc<dyn Clock>,
    /// Remaining budget as of `started_at` (or now, when not running).
    budget: Duration,
    started_at: Option<Instant>,
    state: CountdownState,
    on_expire: Option<Callback>,
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("budget", &self.budget)
            .field("state", &self.state)
            .finish()
    }
}

impl Countdown {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            budget: Duration::ZERO,
            started_at: None,
            state: CountdownState::Idle,
            on_expire: None,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    /// Start a fresh run of `seconds`, replacing any previous callback.
    pub fn start(&mut self, seconds: u64, on_expire: impl FnOnce() + 'static) {
        self.budget = Duration::from_secs(seconds);
        self.run(Box::new(on_expire));
    }

    /// Continue with whatever budget is left from earlier runs.
    pub fn rearm(&mut self, on_expire: impl FnOnce() + 'static) {
        self.budget = self.remaining();
        self.run(Box::new(on_expire));
    }

    fn run(&mut self, on_expire: Callback) {
        self.started_at = Some(self.clock.now());
        self.state = CountdownState::Running;
        self.on_expire = Some(on_expire);
    }

    /// Stop and drop the callback. The remaining budget is kept for `rearm`.
    pub fn cancel(&mut self) {
        if self.state == CountdownState::Expired {
            return;
        }
        self.budget = self.remaining();
        self.started_at = None;
        self.on_expire = None;
        self.state = CountdownState::Cancelled;
    }

    pub fn pause(&mut self) {
        if self.state != CountdownState::Running {
            return;
        }
        self.budget = self.remaining();
        self.started_at = None;
        self.state = CountdownState::Paused;
    }

    /// Continue after `pause`; the paused interval is not charged.
    pub fn resume(&mut self) {
        if self.state != CountdownState::Paused {
            return;
        }
        self.started_at = Some(self.clock.now());
        self.state = CountdownState::Running;
    }

    pub fn remaining(&self) -> Duration {
        match (self.state, self.started_at) {
            (CountdownState::Running, Some(started)) => {
                let elapsed = self.clock.now().saturating_duration_since(started);
                self.budget.saturating_sub(elapsed)
            }
            _ => self.budget,
        }
    }

    /// Remaining whole seconds, rounded up.
    pub fn remaining_secs(&self) -> u64 {
        let remaining = self.remaining();
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    /// Fire the callback if the budget ran out. Returns true exactly once per run.
    pub fn poll(&mut self) -> bool {
        if !self.is_running() || !self.remaining().is_zero() {
            return false;
        }
        self.budget = Duration::ZERO;
        self.started_at = None;
        self.state = CountdownState::Expired;
        debug!("[Countdown] Expired");
        if let Some(callback) = self.on_expire.take() {
            callback();
        }
        true
    }
}
