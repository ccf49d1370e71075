use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::store::SessionStore;
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = &cli.command
    {
        let dest = expand_tilde(file);
        ensure_writable(&dest, *force)?;

        let store = SessionStore::open_with_config(cfg)?;
        let final_path = BackupLogic::backup(&store, &dest.to_string_lossy(), *compress)?;

        // log interno (non bloccante)
        if let Err(e) = store.audit(
            "backup",
            &final_path.to_string_lossy(),
            if *compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        ) {
            warning(format!("Failed to write internal log: {}", e));
        }

        store.close()?;
    }

    Ok(())
}
