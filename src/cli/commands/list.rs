use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::event::EventRecord;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { limit } = cmd {
        let store = open_store(cfg)?;
        let events = store.list(*limit)?;

        if events.is_empty() {
            println!("No events recorded.");
            return Ok(());
        }

        print_events(&events);
    }
    Ok(())
}

fn print_events(events: &[EventRecord]) {
    println!("EVENTS:");
    for ev in events {
        let extra = ev.extra_text();
        if extra.is_empty() {
            println!("- #{} | {} | {} | {}", ev.id, ev.timestamp, ev.event_name, ev.note);
        } else {
            println!(
                "- #{} | {} | {} | {} | {}",
                ev.id, ev.timestamp, ev.event_name, ev.note, extra
            );
        }
    }
}
