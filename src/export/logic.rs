// src/export/logic.rs

use crate::core::report::ReportRow;
use crate::errors::AppResult;
use crate::export::ReportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{export_to_row, get_headers, rows_to_exports};
use crate::export::xlsx::export_xlsx;
use crate::export::notify_export_success;
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;
use std::fs;
use std::path::PathBuf;

/// Logica di alto livello per l'export del report.
pub struct ExportLogic;

impl ExportLogic {
    /// Render `rows` as a plain-text table.
    pub fn render_table(rows: &[ReportRow]) -> String {
        let exports = rows_to_exports(rows);
        let mut table = Table::with_headers(&get_headers());
        for e in &exports {
            table.add_row(export_to_row(e));
        }
        table.render()
    }

    /// Write the report to `file` in the requested format.
    ///
    /// - `format`: table | xlsx | csv | json
    /// - `file`: output path (`~/` is expanded)
    /// - `force`: overwrite without asking
    pub fn export(rows: &[ReportRow], format: ReportFormat, file: &str, force: bool) -> AppResult<PathBuf> {
        let path = expand_tilde(file);

        ensure_writable(&path, force)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let exports = rows_to_exports(rows);

        match format {
            ReportFormat::Xlsx => export_xlsx(&exports, &path)?,
            ReportFormat::Csv => export_csv(&exports, &path)?,
            ReportFormat::Json => export_json(&exports, &path)?,
            ReportFormat::Table => {
                fs::write(&path, Self::render_table(rows))?;
                notify_export_success("Text", &path);
            }
        }

        Ok(path)
    }
}
