use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::SessionStore;
use crate::utils::colors::{YELLOW, RESET, colorize_in_out};
use crate::utils::formatting::bold;
use crate::utils::time::format_clock;

/// Handle `status`: read-only, never creates a record.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if matches!(cli.command, Commands::Status) {
        let (user_id, _) = identity(cli)?;
        let store = SessionStore::open_with_config(cfg)?;
        let status = store.status_of(&user_id)?;
        store.close()?;

        let fmt = cfg.time_format.as_str();

        println!("{}", bold(&format!("Status for {}:", status.name)));
        println!(
            "⏰ Clocked in: {}",
            colorize_in_out(&format_clock(status.clock_in, fmt), true)
        );

        if let Some(out) = status.clock_out {
            println!(
                "🚪 Clocked out: {}",
                colorize_in_out(&format_clock(out, fmt), false)
            );
        }

        match status.active_break {
            Some(start) => println!(
                "☕ {YELLOW}On a break since {}{RESET}",
                format_clock(start, fmt)
            ),
            None => println!("✅ Not currently on a break"),
        }
    }

    Ok(())
}
