use crate::cli::commands::open_store;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let removed = store.clear_all()?;
    success(format!("Removed {removed} records."));
    Ok(())
}
