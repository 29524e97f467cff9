use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::{EventStore, log};
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (unless `--test`), then the
/// database with all pending migrations applied.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing rcarelog…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database    : {}", db_path.display());

    let store = EventStore::open(&db_path)?;
    store.init()?;

    success(format!("Database initialized at {}", db_path.display()));

    // audit failures are not fatal here
    if let Err(e) = log::audit(
        store.conn(),
        "init",
        "database",
        &format!("Database initialized at {}", db_path.display()),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    Ok(())
}
