use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::reset::{ResetLogic, StdinConfirmation};
use crate::errors::AppResult;
use crate::store::SessionStore;
use crate::ui::messages::{success, warning};

/// Handle `reset`: allow-list check, typed confirmation within the configured timeout.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if matches!(cli.command, Commands::Reset) {
        let (user_id, _) = identity(cli)?;
        // refuse before opening the store or taking over stdin;
        // `ResetLogic::run` checks again for library callers
        ResetLogic::authorize(cfg, &user_id)?;

        let store = SessionStore::open_with_config(cfg)?;
        let mut source = StdinConfirmation::spawn(&user_id);

        ResetLogic::run(&store, cfg, &user_id, &mut source, |prompt| warning(prompt))?;
        store.close()?;

        success("All time data has been reset.");
    }

    Ok(())
}
