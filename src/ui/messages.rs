//! Console output helpers.
//!
//! Every helper emits a whole line through a single `println!`/`eprintln!`,
//! which holds the stream lock for the duration of the call. Timer threads
//! and the session loop print through these, so their lines never interleave
//! mid-line.

use std::fmt;
use std::io::{self, Write};

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const FG_CYAN: &str = "\x1b[36m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_TIMER: &str = "⏱️";

/// Width used to wrap assistant replies.
const REPLY_WIDTH: usize = 88;

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_RED, BOLD, ICON_ERR, RESET, msg);
}

/// Timer heartbeat / completion line.
pub fn timer<T: fmt::Display>(msg: T) {
    println!("{}{}{} [timer]{} {}", FG_CYAN, BOLD, ICON_TIMER, RESET, msg);
}

/// Assistant reply, wrapped to a readable width.
pub fn reply<T: fmt::Display>(msg: T) {
    let text = msg.to_string();
    let wrapped = textwrap::fill(&text, REPLY_WIDTH);
    println!("{}\n", wrapped);
}

/// Optional: formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!(
        "{}{}====================== {}\n{}",
        FG_BLUE, BOLD, msg, RESET
    );
}

/// Ring the terminal bell. Best effort: a closed stdout is not an error here.
pub fn bell() -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(b"\x07")?;
    out.flush()
}

/// Print the interactive prompt without a trailing newline.
pub fn prompt(p: &str) {
    let mut out = io::stdout().lock();
    let _ = write!(out, "{p}");
    let _ = out.flush();
}
