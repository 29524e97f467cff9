pub mod clear;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod run;
pub mod timer;

use crate::config::Config;
use crate::db::EventStore;
use crate::errors::AppResult;
use crate::utils::path::expand_tilde;

/// Open the configured store with its schema up to date.
pub(crate) fn open_store(cfg: &Config) -> AppResult<EventStore> {
    let store = EventStore::open(expand_tilde(&cfg.database))?;
    store.init()?;
    Ok(store)
}
