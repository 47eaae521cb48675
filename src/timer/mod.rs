//! Per-team countdown clocks.

pub mod actor;
pub mod clock;
pub mod countdown;

pub use actor::{CountdownActor, CountdownExpired, CountdownTick};
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::Countdown;
