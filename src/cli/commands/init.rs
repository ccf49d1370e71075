use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::SessionStore;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the session store and its schema
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.store.as_deref(), cli.test)?;

    println!("⚙️  Initializing timeclock…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Store       : {}", &cfg.storage);

    let store = SessionStore::open_with_config(&cfg)?;

    // log interno (non bloccante)
    if let Err(e) = store.audit(
        "init",
        "",
        &format!("Session store initialized at {}", &cfg.storage),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    store.close()?;

    success("timeclock initialization completed!");
    Ok(())
}
