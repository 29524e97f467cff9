use crate::errors::AppError;
use crate::ui::messages;
use crate::utils::time::format_seconds;

/// Receives timer progress from timer threads.
///
/// Implementations are called concurrently from every running timer.
pub trait TimerObserver: Send + Sync {
    fn on_progress(&self, label: &str, remaining: u64);

    /// Expiry signal, emitted before the completion callback runs.
    fn on_expired(&self, label: &str, seconds: u64);

    fn on_callback_error(&self, label: &str, err: &AppError);

    fn on_cancelled(&self, _label: &str) {}
}

/// Prints heartbeat lines and rings the terminal bell on expiry.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleObserver;

impl TimerObserver for ConsoleObserver {
    fn on_progress(&self, label: &str, remaining: u64) {
        messages::timer(format!("{label}: {} remaining", format_seconds(remaining)));
    }

    fn on_expired(&self, label: &str, seconds: u64) {
        // a missing terminal must not stop the timer
        let _ = messages::bell();
        messages::timer(format!("{label}: time's up! ({seconds}s)"));
    }

    fn on_callback_error(&self, label: &str, err: &AppError) {
        messages::error(format!("[timer] {label}: {err}"));
    }

    fn on_cancelled(&self, label: &str) {
        messages::timer(format!("{label}: cancelled"));
    }
}
