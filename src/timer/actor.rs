//! Team clock actor.
//!
//! Polls a [`Countdown`] on the session's arbiter and reports whole-second
//! changes and expiry to the session. Every arm carries a run number chosen
//! by the session, which echoes back in [`CountdownExpired`] so that an
//! expiry already queued when the clock was disarmed can be recognised and
//! dropped.

use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use log::debug;

use crate::game::types::TeamId;
use crate::timer::clock::Clock;
use crate::timer::countdown::{Countdown, CountdownState};

/// Start the clock, or continue it with the budget left from earlier turns.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Arm {
    pub run: u64,
}

/// Stop the clock and keep its remaining budget.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Disarm;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Pause;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Resume;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "u64")]
pub struct GetRemainingSecs;

/// Stop the actor for good.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Shutdown;

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
#[rtype(result = "()")]
pub struct CountdownTick {
    pub team: TeamId,
    pub run: u64,
    pub remaining_secs: u64,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
#[rtype(result = "()")]
pub struct CountdownExpired {
    pub team: TeamId,
    pub run: u64,
}

pub struct CountdownActor {
    team: TeamId,
    budget_secs: u64,
    countdown: Countdown,
    run: u64,
    last_secs: Option<u64>,
    tick: Duration,
    ticks: Recipient<CountdownTick>,
    expiries: Recipient<CountdownExpired>,
}

impl CountdownActor {
    pub fn new(
        team: TeamId,
        budget_secs: u64,
        tick: Duration,
        clock: Arc<dyn Clock>,
        ticks: Recipient<CountdownTick>,
        expiries: Recipient<CountdownExpired>,
    ) -> Self {
        Self {
            team,
            budget_secs,
            countdown: Countdown::new(clock),
            run: 0,
            last_secs: None,
            tick,
            ticks,
            expiries,
        }
    }

    fn poll(&mut self) {
        if !self.countdown.is_running() {
            return;
        }
        let secs = self.countdown.remaining_secs();
        if self.last_secs != Some(secs) {
            self.last_secs = Some(secs);
            self.ticks.do_send(CountdownTick {
                team: self.team,
                run: self.run,
                remaining_secs: secs,
            });
        }
        self.countdown.poll();
    }
}

impl Actor for CountdownActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        ctx.run_interval(self.tick, |act, _| act.poll());
    }
}

impl Handler<Arm> for CountdownActor {
    type Result = ();

    fn handle(&mut self, msg: Arm, _: &mut Context<Self>) -> Self::Result {
        self.run = msg.run;
        self.last_secs = None;
        let (expiries, team, run) = (self.expiries.clone(), self.team, msg.run);
        let on_expire = move || expiries.do_send(CountdownExpired { team, run });
        if self.countdown.state() == CountdownState::Idle {
            self.countdown.start(self.budget_secs, on_expire);
        } else {
            self.countdown.rearm(on_expire);
        }
        debug!(
            "[Countdown] {} armed (run {}), {}s left",
            self.team,
            run,
            self.countdown.remaining_secs()
        );
    }
}

impl Handler<Disarm> for CountdownActor {
    type Result = ();

    fn handle(&mut self, _: Disarm, _: &mut Context<Self>) -> Self::Result {
        self.countdown.cancel();
        debug!(
            "[Countdown] {} disarmed, {}s banked",
            self.team,
            self.countdown.remaining_secs()
        );
    }
}

impl Handler<Pause> for CountdownActor {
    type Result = ();

    fn handle(&mut self, _: Pause, _: &mut Context<Self>) -> Self::Result {
        self.countdown.pause();
    }
}

impl Handler<Resume> for CountdownActor {
    type Result = ();

    fn handle(&mut self, _: Resume, _: &mut Context<Self>) -> Self::Result {
        self.countdown.resume();
    }
}

impl Handler<GetRemainingSecs> for CountdownActor {
    type Result = u64;

    fn handle(&mut self, _: GetRemainingSecs, _: &mut Context<Self>) -> Self::Result {
        self.countdown.remaining_secs()
    }
}

impl Handler<Shutdown> for CountdownActor {
    type Result = ();

    fn handle(&mut self, _: Shutdown, ctx: &mut Context<Self>) -> Self::Result {
        self.countdown.cancel();
        ctx.stop();
    }
}
