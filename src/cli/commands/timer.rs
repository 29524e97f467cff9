use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dispatch::finish_hint_callback;
use crate::errors::{AppError, AppResult};
use crate::timer::{ConsoleObserver, TimerEngine, TimerOutcome};
use std::sync::Arc;
use std::time::Duration;

/// Run one countdown and block until it completes.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Timer { seconds, label } = cmd {
        let seconds = seconds.unwrap_or(cfg.default_timer_seconds);
        let label = label
            .clone()
            .unwrap_or_else(|| cfg.default_timer_label.clone());

        let engine = TimerEngine::new(Arc::new(ConsoleObserver))
            .with_tick(Duration::from_millis(cfg.timer_tick_ms));
        let handle = engine.start(
            seconds,
            &label,
            Some(finish_hint_callback(cfg.timer_finish_hint.clone())),
        )?;

        let done = handle
            .wait()
            .ok_or_else(|| AppError::Other(format!("timer '{label}' stopped without reporting")))?;

        if let TimerOutcome::CallbackFailed(msg) = done.outcome {
            return Err(AppError::Callback(msg));
        }
    }
    Ok(())
}
