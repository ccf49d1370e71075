use crate::cli::commands::identity;
use crate::cli::parser::{Cli, ClockAction, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::SessionStore;
use crate::ui::messages::success;
use crate::utils::time::format_clock;

/// Handle `clock in` / `clock out`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Clock { action } = &cli.command {
        let (user_id, name) = identity(cli)?;
        let store = SessionStore::open_with_config(cfg)?;
        let record = store.ensure(&user_id, &name)?;

        match action {
            ClockAction::In => {
                let ts = store.clock_in(&user_id)?;
                success(format!(
                    "{} clocked in at {}",
                    record.name,
                    format_clock(ts, &cfg.time_format)
                ));
            }
            ClockAction::Out => {
                let ts = store.clock_out(&user_id)?;
                success(format!(
                    "{} clocked out at {}",
                    record.name,
                    format_clock(ts, &cfg.time_format)
                ));
            }
        }

        store.close()?;
    }

    Ok(())
}
