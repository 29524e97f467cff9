//! Action dispatch: one classified action in, at most one side effect out.

use crate::classifier::Classifier;
use crate::config::Config;
use crate::db::EventStore;
use crate::errors::AppResult;
use crate::models::action::ActionValue;
use crate::timer::{FinishCallback, TimerEngine, TimerHandle};
use crate::ui::messages;
use crate::utils::time::{now_in_zone, parse_offset, validate_format};
use chrono::FixedOffset;
use serde_json::Value;

/// Prompt used to ask for a suggestion after every recorded event.
pub const FOLLOW_UP_PROMPT: &str = "what should I do next";

/// Event name of records forced by a trigger keyword.
pub const AUTO_RECORD_EVENT: &str = "auto-record";

/// User-facing message produced by a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
    Reply(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(s)
            | Notice::Success(s)
            | Notice::Warning(s)
            | Notice::Error(s)
            | Notice::Reply(s) => s,
        }
    }

    pub fn print(&self) {
        match self {
            Notice::Info(s) => messages::info(s),
            Notice::Success(s) => messages::success(s),
            Notice::Warning(s) => messages::warning(s),
            Notice::Error(s) => messages::error(s),
            Notice::Reply(s) => messages::reply(s),
        }
    }
}

/// Result of one dispatch call.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// The action the classifier produced (or the fallback reply).
    pub action: ActionValue,
    pub notices: Vec<Notice>,
    /// Ids of records appended during this call.
    pub recorded: Vec<i64>,
    /// `(label, seconds)` of the timer started during this call.
    pub timer_started: Option<(String, u64)>,
}

impl DispatchOutcome {
    fn new(action: ActionValue) -> Self {
        Self {
            action,
            notices: Vec::new(),
            recorded: Vec::new(),
            timer_started: None,
        }
    }

    pub fn print(&self) {
        for n in &self.notices {
            n.print();
        }
    }
}

/// Dispatch-time knobs, resolved once from [`Config`].
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub trigger_keywords: Vec<String>,
    pub default_event_name: String,
    pub default_timer_label: String,
    pub default_timer_seconds: i64,
    pub timer_finish_hint: String,
    pub history_limit: Option<usize>,
    pub utc_offset: Option<FixedOffset>,
    pub timestamp_format: String,
}

impl DispatchSettings {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        validate_format(&cfg.timestamp_format)?;

        Ok(Self {
            trigger_keywords: cfg
                .trigger_keywords
                .iter()
                .filter(|k| !k.trim().is_empty())
                .cloned()
                .collect(),
            default_event_name: cfg.default_event_name.clone(),
            default_timer_label: cfg.default_timer_label.clone(),
            default_timer_seconds: cfg.default_timer_seconds,
            timer_finish_hint: cfg.timer_finish_hint.clone(),
            history_limit: cfg.history_limit,
            utc_offset: parse_offset(&cfg.utc_offset)?,
            timestamp_format: cfg.timestamp_format.clone(),
        })
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        // `Config::default()` always carries a valid offset
        Self::from_config(&Config::default()).unwrap_or_else(|_| Self {
            trigger_keywords: Vec::new(),
            default_event_name: "event".to_string(),
            default_timer_label: "timer".to_string(),
            default_timer_seconds: 60,
            timer_finish_hint: String::new(),
            history_limit: None,
            utc_offset: None,
            timestamp_format: "%Y/%m/%d %H:%M".to_string(),
        })
    }
}

/// Owns the store, the classifier and the session's rolling history.
pub struct ActionDispatcher {
    store: EventStore,
    classifier: Box<dyn Classifier>,
    timers: TimerEngine,
    settings: DispatchSettings,
    history: Vec<String>,
    active: Vec<TimerHandle>,
}

impl ActionDispatcher {
    pub fn new(
        store: EventStore,
        classifier: Box<dyn Classifier>,
        timers: TimerEngine,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            classifier,
            timers,
            settings,
            history: Vec::new(),
            active: Vec::new(),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Rolling history, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    /// Timers that have not completed yet.
    pub fn active_timers(&mut self) -> &[TimerHandle] {
        self.active.retain(|t| !t.is_finished());
        &self.active
    }

    /// Cancel the `index`-th active timer, returning its label.
    pub fn cancel_timer(&mut self, index: usize) -> Option<String> {
        self.active.retain(|t| !t.is_finished());
        if index >= self.active.len() {
            return None;
        }
        let handle = self.active.remove(index);
        handle.cancel();
        Some(handle.label().to_string())
    }

    /// Classify `input` and apply the resulting action.
    pub fn dispatch(&mut self, input: &str) -> DispatchOutcome {
        let action = self.classify(input);
        self.apply(input, action)
    }

    /// Apply an already classified action for `input`.
    pub fn apply(&mut self, input: &str, action: ActionValue) -> DispatchOutcome {
        let mut out = DispatchOutcome::new(action.clone());

        if self.triggers_auto_record(input, &action) {
            self.auto_record(input, &mut out);
        }

        match action {
            ActionValue::Reply { message } => out.notices.push(Notice::Reply(message)),
            ActionValue::RecordEvent { event, note, extra } => {
                self.record_event(event, note, extra, &mut out)
            }
            ActionValue::StartTimer { seconds, label } => self.start_timer(seconds, label, &mut out),
            ActionValue::Unrecognized => out.notices.push(Notice::Warning(
                "Could not parse the action, please rephrase.".to_string(),
            )),
        }

        out
    }

    /// Classifier call that never fails: errors become a diagnostic reply.
    fn classify(&self, input: &str) -> ActionValue {
        match self.classifier.classify(input, &self.history) {
            Ok(action) => action,
            Err(e) => ActionValue::reply(format!("Could not classify the input: {e}")),
        }
    }

    fn now(&self) -> String {
        now_in_zone(self.settings.utc_offset, &self.settings.timestamp_format)
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if let Some(limit) = self.settings.history_limit
            && self.history.len() > limit
        {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    fn contains_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.settings
            .trigger_keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }

    fn triggers_auto_record(&self, input: &str, action: &ActionValue) -> bool {
        if self.contains_keyword(input) {
            return true;
        }
        matches!(action, ActionValue::Reply { message } if self.contains_keyword(message))
    }

    fn auto_record(&mut self, input: &str, out: &mut DispatchOutcome) {
        let ts = self.now();
        let note = format!("trigger keyword: {input}");

        match self.store.append(AUTO_RECORD_EVENT, &note, Some(&ts), None) {
            Ok(id) => {
                out.recorded.push(id);
                self.push_history(format!("{ts}  {input}"));
                out.notices
                    .push(Notice::Success(format!("Auto-recorded event: {ts}")));
            }
            Err(e) => out
                .notices
                .push(Notice::Error(format!("Failed to auto-record event: {e}"))),
        }
    }

    fn record_event(
        &mut self,
        event: Option<String>,
        note: Option<String>,
        extra: Option<Value>,
        out: &mut DispatchOutcome,
    ) {
        let name = event
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| self.settings.default_event_name.clone());
        let note = note.unwrap_or_default();
        let ts = self.now();

        match self.store.append(&name, &note, Some(&ts), extra.as_ref()) {
            Ok(id) => {
                out.recorded.push(id);
                self.push_history(format!("{ts} {name} - {note}"));
                out.notices
                    .push(Notice::Success(format!("Recorded event: {ts} {name}")));
            }
            Err(e) => {
                out.notices
                    .push(Notice::Error(format!("Failed to record event: {e}")));
                return;
            }
        }

        match self.classify(FOLLOW_UP_PROMPT) {
            ActionValue::Reply { message } => out
                .notices
                .push(Notice::Reply(format!("Suggested next step: {message}"))),
            _ => out.notices.push(Notice::Warning(
                "Cannot advise on the next step, please proceed manually.".to_string(),
            )),
        }
    }

    fn start_timer(&mut self, seconds: Option<i64>, label: Option<String>, out: &mut DispatchOutcome) {
        let seconds = seconds.unwrap_or(self.settings.default_timer_seconds);
        let label = label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.settings.default_timer_label.clone());

        let callback = finish_hint_callback(self.settings.timer_finish_hint.clone());

        match self.timers.start(seconds, &label, Some(callback)) {
            Ok(handle) => {
                let secs = handle.seconds();
                self.active.push(handle);
                out.timer_started = Some((label.clone(), secs));
                out.notices
                    .push(Notice::Success(format!("Timer started: {secs}s ({label})")));
            }
            Err(e) => out
                .notices
                .push(Notice::Error(format!("Failed to start timer: {e}"))),
        }
    }
}

/// Completion callback that prints the finished timer and the configured hint.
pub fn finish_hint_callback(hint: String) -> FinishCallback {
    Box::new(move |label: &str, seconds: u64| -> AppResult<()> {
        messages::info(format!("[callback] timer '{label}' finished ({seconds}s)"));
        if !hint.is_empty() {
            messages::info(&hint);
        }
        Ok(())
    })
}
