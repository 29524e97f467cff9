use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::AppResult;
use std::io;

pub fn handle(cmd: Option<&Commands>, cfg: &Config) -> AppResult<()> {
    let keep = matches!(cmd, Some(Commands::Run { keep: true }));

    let cfg = Config {
        clear_on_start: cfg.clear_on_start && !keep,
        ..cfg.clone()
    };

    let mut session = Session::start(&cfg)?;
    session.run(io::stdin().lock())
}
