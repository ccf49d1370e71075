use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::report::ReportBuilder;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportLogic, ReportFormat};
use crate::store::SessionStore;
use crate::ui::messages::info;
use std::path::Path;

/// Handle `report`: build rows from a snapshot, then print or export them.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        format,
        file,
        force,
    } = &cli.command
    {
        // the store is released before any rendering work starts
        let store = SessionStore::open_with_config(cfg)?;
        let snapshot = store.snapshot()?;
        store.close()?;

        let rows = ReportBuilder::build(&snapshot)?;

        match file {
            Some(f) => {
                let fmt = format.unwrap_or_else(|| ReportFormat::from_path(Path::new(f)));
                ExportLogic::export(&rows, fmt, f, *force)?;
            }
            None => match format {
                None | Some(ReportFormat::Table) => {
                    info(format!("Time report ({} users)", rows.len()));
                    print!("{}", ExportLogic::render_table(&rows));
                }
                Some(other) => {
                    return Err(AppError::InvalidExportFormat(format!(
                        "{} requires --file",
                        other.as_str()
                    )));
                }
            },
        }
    }

    Ok(())
}
