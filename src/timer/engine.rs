use super::{MAX_TIMER_SECS, TimerCompletion, TimerObserver, TimerOutcome, should_announce};
use crate::errors::{AppError, AppResult};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Completion callback, invoked once with `(label, seconds)` on the timer thread.
pub type FinishCallback = Box<dyn FnOnce(&str, u64) -> AppResult<()> + Send + 'static>;

const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Spawns independent countdowns. Holds no per-timer state.
#[derive(Clone)]
pub struct TimerEngine {
    tick: Duration,
    observer: Arc<dyn TimerObserver>,
}

impl TimerEngine {
    pub fn new(observer: Arc<dyn TimerObserver>) -> Self {
        Self {
            tick: DEFAULT_TICK,
            observer,
        }
    }

    /// Override the sleep increment between remaining-time checks.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = if tick.is_zero() { DEFAULT_TICK } else { tick };
        self
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Start a countdown and return immediately.
    ///
    /// `seconds <= 0` expires at the first scheduling opportunity; durations
    /// above [`MAX_TIMER_SECS`] are clamped.
    pub fn start(
        &self,
        seconds: i64,
        label: &str,
        on_finish: Option<FinishCallback>,
    ) -> AppResult<TimerHandle> {
        let seconds = seconds.clamp(0, MAX_TIMER_SECS as i64) as u64;
        let label = label.to_string();
        let cancel = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let worker = Countdown {
            label: label.clone(),
            seconds,
            tick: self.tick,
            observer: Arc::clone(&self.observer),
            cancel: Arc::clone(&cancel),
            finished: Arc::clone(&finished),
            done: tx,
        };

        let thread = thread::Builder::new()
            .name(thread_name(&label))
            .spawn(move || worker.run(on_finish))?;

        Ok(TimerHandle {
            label,
            seconds,
            started_at: Instant::now(),
            cancel,
            finished,
            completion: rx,
            thread,
        })
    }
}

/// A running countdown. Dropping the handle detaches the timer; it keeps
/// running until expiry or process exit.
pub struct TimerHandle {
    label: String,
    seconds: u64,
    started_at: Instant,
    cancel: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    completion: Receiver<TimerCompletion>,
    thread: JoinHandle<()>,
}

impl TimerHandle {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Whole seconds left, rounded up. Zero once the deadline has passed.
    pub fn remaining_secs(&self) -> u64 {
        let deadline = deadline_after(self.started_at, self.seconds);
        ceil_secs(deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst) || self.thread.is_finished()
    }

    /// Ask the timer to stop at its next tick. Its callback will not run.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Block until the timer completes. `None` if the completion was already
    /// taken or the timer thread died without reporting.
    pub fn wait(&self) -> Option<TimerCompletion> {
        self.completion.recv().ok()
    }

    pub fn wait_timeout(&self, timeout: Duration) -> Option<TimerCompletion> {
        match self.completion.recv_timeout(timeout) {
            Ok(c) => Some(c),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Non-blocking poll for the completion.
    pub fn try_completion(&self) -> Option<TimerCompletion> {
        match self.completion.try_recv() {
            Ok(c) => Some(c),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

struct Countdown {
    label: String,
    seconds: u64,
    tick: Duration,
    observer: Arc<dyn TimerObserver>,
    cancel: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    done: Sender<TimerCompletion>,
}

impl Countdown {
    fn run(self, on_finish: Option<FinishCallback>) {
        let outcome = if self.count_down() {
            self.finish(on_finish)
        } else {
            self.observer.on_cancelled(&self.label);
            TimerOutcome::Cancelled
        };

        self.finished.store(true, Ordering::SeqCst);

        // the receiver may be gone if the handle was dropped
        let _ = self.done.send(TimerCompletion {
            label: self.label.clone(),
            seconds: self.seconds,
            outcome,
        });
    }

    /// Sleep until the deadline, announcing remaining time. Returns false if cancelled.
    fn count_down(&self) -> bool {
        let deadline = deadline_after(Instant::now(), self.seconds);
        let mut last_seen: Option<u64> = None;

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return false;
            }

            let now = Instant::now();
            if now >= deadline {
                return true;
            }

            let left = deadline - now;
            let remaining = ceil_secs(left);

            if last_seen.is_none_or(|prev| remaining < prev) {
                last_seen = Some(remaining);
                if should_announce(remaining) {
                    self.observer.on_progress(&self.label, remaining);
                }
            }

            thread::sleep(self.tick.min(left));
        }
    }

    fn finish(&self, on_finish: Option<FinishCallback>) -> TimerOutcome {
        self.observer.on_expired(&self.label, self.seconds);

        let Some(callback) = on_finish else {
            return TimerOutcome::Finished;
        };

        let result = catch_unwind(AssertUnwindSafe(|| callback(&self.label, self.seconds)));

        let err = match result {
            Ok(Ok(())) => return TimerOutcome::Finished,
            Ok(Err(e)) => AppError::Callback(e.to_string()),
            Err(payload) => AppError::Callback(panic_message(payload.as_ref())),
        };

        self.observer.on_callback_error(&self.label, &err);
        TimerOutcome::CallbackFailed(err.to_string())
    }
}

/// Thread names cannot carry NUL bytes; the label itself is kept as given.
fn thread_name(label: &str) -> String {
    format!("timer-{}", label.replace('\0', ""))
}

fn deadline_after(start: Instant, seconds: u64) -> Instant {
    start
        .checked_add(Duration::from_secs(seconds))
        .or_else(|| start.checked_add(Duration::from_secs(MAX_TIMER_SECS)))
        .unwrap_or(start)
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
