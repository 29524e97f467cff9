use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rcarelog
#[derive(Parser)]
#[command(
    name = "rcarelog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Emergency-care field assistant: log care events and run countdown timers using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Start an interactive assistant session
    Run {
        #[arg(long = "keep", help = "Keep records from previous sessions")]
        keep: bool,
    },

    /// List the most recent care events
    List {
        #[arg(long, short, default_value_t = 50, help = "Maximum number of events")]
        limit: i64,
    },

    /// Export every care event
    Export {
        #[arg(long, value_enum, default_value = "xlsx")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete every care event
    Clear,

    /// Run a countdown in the foreground
    Timer {
        #[arg(long, short, help = "Duration in seconds")]
        seconds: Option<i64>,

        #[arg(long, short = 'l')]
        label: Option<String>,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
