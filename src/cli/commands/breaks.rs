use crate::cli::commands::identity;
use crate::cli::parser::{BreakAction, Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::SessionStore;
use crate::ui::messages::success;
use crate::utils::time::format_clock;

/// Handle `break start` / `break end`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Break { action } = &cli.command {
        let (user_id, name) = identity(cli)?;
        let store = SessionStore::open_with_config(cfg)?;
        let record = store.ensure(&user_id, &name)?;

        match action {
            BreakAction::Start => {
                let ts = store.start_break(&user_id)?;
                println!(
                    "☕ {} started a break at {}",
                    record.name,
                    format_clock(ts, &cfg.time_format)
                );
            }
            BreakAction::End => {
                let ts = store.end_break(&user_id)?;
                success(format!(
                    "{} ended the break at {}",
                    record.name,
                    format_clock(ts, &cfg.time_format)
                ));
            }
        }

        store.close()?;
    }

    Ok(())
}
