//! Cancellable, re-armable waits on an actor's context.
//!
//! A `PendingWait` holds at most one scheduled timeout. When the timeout fires
//! the owner decides, through the wait's `RetryPolicy`, whether to schedule
//! the same wait again instead of spawning a new task each time.

use std::time::Duration;

use actix::prelude::*;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` re-arms for as long as the owner asks.
    max_rearms: Option<u32>,
}

impl RetryPolicy {
    pub fn never() -> Self {
        Self { max_rearms: Some(0) }
    }

    pub fn forever() -> Self {
        Self { max_rearms: None }
    }

    pub fn times(max_rearms: u32) -> Self {
        Self {
            max_rearms: Some(max_rearms),
        }
    }

    pub fn allows(&self, rearms: u32) -> bool {
        self.max_rearms.is_none_or(|max| rearms <= max)
    }
}

#[derive(Debug)]
pub struct PendingWait {
    label: &'static str,
    timeout: Duration,
    policy: RetryPolicy,
    rearms: u32,
    handle: Option<SpawnHandle>,
}

impl PendingWait {
    pub fn new(label: &'static str, timeout: Duration, policy: RetryPolicy) -> Self {
        Self {
            label,
            timeout,
            policy,
            rearms: 0,
            handle: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn rearms(&self) -> u32 {
        self.rearms
    }

    /// Schedule `on_timeout`, replacing any wait already armed.
    pub fn arm<A, F>(&mut self, ctx: &mut Context<A>, on_timeout: F)
    where
        A: Actor<Context = Context<A>>,
        F: FnOnce(&mut A, &mut Context<A>) + 'static,
    {
        self.cancel(ctx);
        self.rearms = 0;
        self.handle = Some(ctx.run_later(self.timeout, on_timeout));
    }

    /// Schedule the same wait again if the policy still allows it.
    pub fn reschedule<A, F>(&mut self, ctx: &mut Context<A>, on_timeout: F) -> bool
    where
        A: Actor<Context = Context<A>>,
        F: FnOnce(&mut A, &mut Context<A>) + 'static,
    {
        if !self.policy.allows(self.rearms + 1) {
            debug!("[Wait] {} gave up after {} re-arm(s)", self.label, self.rearms);
            self.handle = None;
            return false;
        }
        self.rearms += 1;
        debug!("[Wait] {} re-armed ({})", self.label, self.rearms);
        self.handle = Some(ctx.run_later(self.timeout, on_timeout));
        true
    }

    /// Mark the wait as fired; call first thing in the timeout callback.
    pub fn fired(&mut self) {
        self.handle = None;
    }

    pub fn cancel<A>(&mut self, ctx: &mut Context<A>)
    where
        A: Actor<Context = Context<A>>,
    {
        if let Some(handle) = self.handle.take() {
            ctx.cancel_future(handle);
        }
    }
}
