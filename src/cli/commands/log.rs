use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;
use crate::store::SessionStore;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if matches!(cli.command, Commands::Log { print: true }) {
        let store = SessionStore::open_with_config(cfg)?;
        LogLogic::print_log(&store)?;
        store.close()?;
    }

    Ok(())
}
