mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;

use codeword::game::types::TeamId;
use codeword::timer::actor::{Arm, Disarm, GetRemainingSecs, Pause, Resume};
use codeword::timer::{Clock, CountdownActor, CountdownExpired, CountdownTick, ManualClock, SystemClock};

use common::init_logger;

/// Collects what a clock actor reports.
#[derive(Default)]
struct Collector {
    ticks: Vec<u64>,
    expiries: Vec<(u64, Instant)>,
}

impl Actor for Collector {
    type Context = Context<Self>;
}

impl Handler<CountdownTick> for Collector {
    type Result = ();

    fn handle(&mut self, msg: CountdownTick, _: &mut Context<Self>) {
        self.ticks.push(msg.remaining_secs);
    }
}

impl Handler<CountdownExpired> for Collector {
    type Result = ();

    fn handle(&mut self, msg: CountdownExpired, _: &mut Context<Self>) {
        self.expiries.push((msg.run, Instant::now()));
    }
}

#[derive(Message)]
#[rtype(result = "(Vec<u64>, Vec<(u64, Instant)>)")]
struct Collected;

impl Handler<Collected> for Collector {
    type Result = MessageResult<Collected>;

    fn handle(&mut self, _: Collected, _: &mut Context<Self>) -> Self::Result {
        MessageResult((self.ticks.clone(), self.expiries.clone()))
    }
}

fn clock_actor(budget_secs: u64, clock: Arc<dyn Clock>, collector: &Addr<Collector>) -> Addr<CountdownActor> {
    CountdownActor::new(
        TeamId(0),
        budget_secs,
        Duration::from_millis(10),
        clock,
        collector.clone().recipient(),
        collector.clone().recipient(),
    )
    .start()
}

#[actix::test]
async fn real_time_countdown_fires_once_after_its_budget() {
    init_logger();
    let collector = Collector::default().start();
    let countdown = clock_actor(2, Arc::new(SystemClock), &collector);

    let armed_at = Instant::now();
    countdown.send(Arm { run: 1 }).await.unwrap();
    actix::clock::sleep(Duration::from_millis(1800)).await;
    let (_, expiries) = collector.send(Collected).await.unwrap();
    assert!(expiries.is_empty());

    actix::clock::sleep(Duration::from_millis(1200)).await;
    let (ticks, expiries) = collector.send(Collected).await.unwrap();
    assert_eq!(expiries.len(), 1);
    let (run, fired_at) = expiries[0];
    assert_eq!(run, 1);
    let waited = fired_at - armed_at;
    assert!(waited >= Duration::from_secs(2) && waited < Duration::from_millis(2500));
    assert_eq!(ticks, vec![2, 1, 0]);
}

#[actix::test]
async fn disarmed_countdown_never_fires_and_banks_its_budget() {
    init_logger();
    let collector = Collector::default().start();
    let countdown = clock_actor(2, Arc::new(SystemClock), &collector);

    countdown.send(Arm { run: 1 }).await.unwrap();
    actix::clock::sleep(Duration::from_millis(500)).await;
    countdown.send(Disarm).await.unwrap();
    actix::clock::sleep(Duration::from_millis(2000)).await;

    let (_, expiries) = collector.send(Collected).await.unwrap();
    assert!(expiries.is_empty());
    assert_eq!(countdown.send(GetRemainingSecs).await.unwrap(), 2);
}

#[actix::test]
async fn rearmed_countdown_continues_from_the_banked_budget() {
    init_logger();
    let clock = Arc::new(ManualClock::new());
    let collector = Collector::default().start();
    let countdown = clock_actor(10, clock.clone(), &collector);

    countdown.send(Arm { run: 1 }).await.unwrap();
    clock.advance(Duration::from_secs(4));
    countdown.send(Disarm).await.unwrap();
    clock.advance(Duration::from_secs(60));
    assert_eq!(countdown.send(GetRemainingSecs).await.unwrap(), 6);

    countdown.send(Arm { run: 2 }).await.unwrap();
    clock.advance(Duration::from_secs(6));
    actix::clock::sleep(Duration::from_millis(100)).await;

    let (_, expiries) = collector.send(Collected).await.unwrap();
    assert_eq!(expiries.iter().map(|(run, _)| *run).collect::<Vec<_>>(), vec![2]);
}

#[actix::test]
async fn paused_countdown_is_not_charged_for_the_pause() {
    init_logger();
    let clock = Arc::new(ManualClock::new());
    let collector = Collector::default().start();
    let countdown = clock_actor(10, clock.clone(), &collector);

    countdown.send(Arm { run: 1 }).await.unwrap();
    clock.advance(Duration::from_secs(2));
    countdown.send(Pause).await.unwrap();
    clock.advance(Duration::from_secs(60));
    actix::clock::sleep(Duration::from_millis(50)).await;
    assert_eq!(countdown.send(GetRemainingSecs).await.unwrap(), 8);

    countdown.send(Resume).await.unwrap();
    clock.advance(Duration::from_secs(3));
    actix::clock::sleep(Duration::from_millis(50)).await;
    assert_eq!(countdown.send(GetRemainingSecs).await.unwrap(), 5);
    let (_, expiries) = collector.send(Collected).await.unwrap();
    assert!(expiries.is_empty());

    clock.advance(Duration::from_secs(5));
    actix::clock::sleep(Duration::from_millis(100)).await;
    let (_, expiries) = collector.send(Collected).await.unwrap();
    assert_eq!(expiries.iter().map(|(run, _)| *run).collect::<Vec<_>>(), vec![1]);
}
