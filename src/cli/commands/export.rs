use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log;
use crate::errors::AppResult;
use crate::export::export_records;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = cmd
    {
        let store = open_store(cfg)?;
        let records = store.list_all()?;
        let path = expand_tilde(file);

        if records.is_empty() {
            println!("⚠️  No events recorded. Exporting an empty log.");
        }

        export_records(&records, *format, &path, *force)?;

        log::audit(
            store.conn(),
            "export",
            format.as_str(),
            &format!("{} records to {}", records.len(), path.display()),
        )?;
    }
    Ok(())
}
