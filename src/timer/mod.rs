//! Non-blocking countdown timers.
//!
//! Each timer runs on its own thread and reports back through a one-shot
//! completion channel on its [`TimerHandle`]. Timers share nothing but the
//! observer that prints their heartbeat.

mod engine;
mod observer;

pub use engine::{FinishCallback, TimerEngine, TimerHandle};
pub use observer::{ConsoleObserver, TimerObserver};

/// Longest countdown accepted. Larger requests are clamped.
pub const MAX_TIMER_SECS: u64 = 24 * 60 * 60;

/// How a timer ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerOutcome {
    Finished,
    /// The completion callback returned an error or panicked.
    CallbackFailed(String),
    Cancelled,
}

/// One-shot completion notice delivered on the handle's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerCompletion {
    pub label: String,
    pub seconds: u64,
    pub outcome: TimerOutcome,
}

/// Heartbeat rule: every full minute, then every second in the last ten.
pub fn should_announce(remaining: u64) -> bool {
    remaining % 60 == 0 || remaining <= 10
}
