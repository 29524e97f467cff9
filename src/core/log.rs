use crate::db::EventStore;
use crate::db::log::{AuditRow, load_log};
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static regex"));

const OP_MAX_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

/// ANSI color for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "init" => Colour::RGB(255, 153, 51),
        "clear" => Colour::Red,
        "export" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        _ => Colour::White,
    }
}

/// Render one audit row: `id: date | op (target) => message`.
pub fn format_row(row: &AuditRow, id_w: usize, date_w: usize, op_w: usize) -> String {
    let color = color_for_operation(&row.operation);

    let op_target = if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    };

    let visible = if op_target.chars().count() > OP_MAX_WIDTH {
        let mut s = op_target.chars().take(OP_MAX_WIDTH - 3).collect::<String>();
        s.push_str("...");
        s
    } else {
        op_target
    };

    // only the operation word is colored
    let colored = match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    };

    let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

    format!(
        "{:>id_w$}: {:<date_w$} | {}{} => {}",
        row.id, row.date, colored, padding, row.message
    )
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(store: &EventStore) -> AppResult<()> {
        let entries = load_log(store.conn())?;

        if entries.is_empty() {
            println!("No log entries.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|r| r.operation.len() + r.target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(OP_MAX_WIDTH);
        let id_w = entries.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|r| r.date.len()).max().unwrap_or(10);

        for row in &entries {
            println!("{}", format_row(row, id_w, date_w, op_w));
        }

        Ok(())
    }
}
