//! Interactive session: startup reset, prompt loop and built-in commands.

use crate::classifier::{self, Classifier};
use crate::config::Config;
use crate::core::dispatch::{ActionDispatcher, DispatchSettings};
use crate::db::{EventStore, log};
use crate::errors::AppResult;
use crate::export::{self, EventExport, ExportFormat};
use crate::timer::{ConsoleObserver, TimerEngine};
use crate::ui::messages::{error, header, info, prompt, success, warning};
use crate::utils::path::expand_tilde;
use crate::utils::time::format_seconds;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const SHOW_TRIGGERS: [&str; 2] = ["show logs", "顯示紀錄"];
const EXPORT_TRIGGERS: [&str; 2] = ["export logs", "匯出紀錄"];

/// What the loop should do after one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Session {
    dispatcher: ActionDispatcher,
    show_limit: i64,
    export_dir: PathBuf,
}

impl Session {
    /// Open the configured store and prepare a fresh session.
    ///
    /// Schema init and the startup clear are fatal: a store that cannot be
    /// initialized or reset stops the program.
    pub fn start(cfg: &Config) -> AppResult<Self> {
        let store = EventStore::open(expand_tilde(&cfg.database))?;
        let classifier = classifier::from_config(&cfg.classifier)?;
        Self::with_parts(cfg, store, classifier)
    }

    pub fn with_parts(
        cfg: &Config,
        store: EventStore,
        classifier: Box<dyn Classifier>,
    ) -> AppResult<Self> {
        store.init()?;
        log::audit(store.conn(), "init", "session", "Session started")?;

        if cfg.clear_on_start {
            store.clear_all()?;
        }

        let timers = TimerEngine::new(Arc::new(ConsoleObserver))
            .with_tick(Duration::from_millis(cfg.timer_tick_ms));
        let settings = DispatchSettings::from_config(cfg)?;

        Ok(Self {
            dispatcher: ActionDispatcher::new(store, classifier, timers, settings),
            show_limit: cfg.show_limit,
            export_dir: expand_tilde(&cfg.export_dir),
        })
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut ActionDispatcher {
        &mut self.dispatcher
    }

    /// Run the prompt loop until `exit` or end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than ending the loop.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> AppResult<()> {
        header("ACLS field assistant");
        info("Type 'help' for the available commands.");

        let mut buf = Vec::new();
        loop {
            prompt("> ");
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                println!();
                break;
            }
            let line = String::from_utf8_lossy(&buf);

            if self.handle_line(&line) == Flow::Exit {
                break;
            }
        }

        let running = self.dispatcher.active_timers().len();
        if running > 0 {
            warning(format!("{running} timer(s) still running will be abandoned."));
        }
        println!("bye");
        Ok(())
    }

    /// Process one line of operator input.
    pub fn handle_line(&mut self, raw: &str) -> Flow {
        let text = raw.trim();
        if text.is_empty() {
            return Flow::Continue;
        }

        match text.to_lowercase().as_str() {
            "exit" | "quit" | "q" => return Flow::Exit,
            "help" | "h" | "?" => {
                print_help();
                return Flow::Continue;
            }
            "timers" => {
                self.print_timers();
                return Flow::Continue;
            }
            _ => {}
        }

        if let Some(arg) = text.strip_prefix("cancel ") {
            self.cancel(arg.trim());
            return Flow::Continue;
        }

        let outcome = self.dispatcher.dispatch(text);
        outcome.print();

        if SHOW_TRIGGERS.iter().any(|t| text.contains(t)) {
            self.show_logs();
        }

        if EXPORT_TRIGGERS.iter().any(|t| text.contains(t)) {
            match self.export_logs() {
                Ok(path) => success(format!("Logs exported to {}", path.display())),
                Err(e) => error(format!("Export failed: {e}")),
            }
        }

        Flow::Continue
    }

    /// XML dump of the most recent records.
    pub fn logs_xml(&self) -> AppResult<String> {
        let rows: Vec<EventExport> = self
            .dispatcher
            .store()
            .list(self.show_limit)?
            .iter()
            .map(EventExport::from)
            .collect();
        Ok(export::to_xml(&rows))
    }

    fn show_logs(&self) {
        match self.logs_xml() {
            Ok(xml) => println!("{xml}"),
            Err(e) => error(format!("Could not read logs: {e}")),
        }
    }

    /// Write every record to a timestamped XLSX file in the export directory.
    pub fn export_logs(&self) -> AppResult<PathBuf> {
        let store = self.dispatcher.store();
        let records = store.list_all()?;
        let path = export::session_export_path(&self.export_dir);

        export::export_records(&records, ExportFormat::Xlsx, &path, true)?;
        log::audit(
            store.conn(),
            "export",
            ExportFormat::Xlsx.as_str(),
            &format!("{} records to {}", records.len(), path.display()),
        )?;
        Ok(path)
    }

    fn print_timers(&mut self) {
        let timers = self.dispatcher.active_timers();
        if timers.is_empty() {
            info("No running timers.");
            return;
        }
        for (i, t) in timers.iter().enumerate() {
            println!(
                "  {}. {} ({} left of {})",
                i + 1,
                t.label(),
                format_seconds(t.remaining_secs()),
                format_seconds(t.seconds())
            );
        }
    }

    fn cancel(&mut self, arg: &str) {
        let Some(index) = arg.parse::<usize>().ok().filter(|n| *n >= 1) else {
            warning(format!("Usage: cancel <n> (see 'timers'), got '{arg}'"));
            return;
        };

        match self.dispatcher.cancel_timer(index - 1) {
            Some(label) => success(format!("Timer '{label}' cancelled.")),
            None => warning(format!("No running timer #{index}.")),
        }
    }
}

fn print_help() {
    println!(
        "Available commands:
  show logs | 顯示紀錄     print the recorded events as XML
  export logs | 匯出紀錄   write all records to an XLSX file
  timers                   list running timers
  cancel <n>               cancel running timer number n
  help                     show this help
  exit                     leave the session
Anything else is sent to the assistant."
    );
}
