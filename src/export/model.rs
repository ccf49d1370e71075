// src/export/model.rs

use crate::core::report::{BreakSpan, ReportRow, WorkDuration};
use crate::utils::secs2hms;
use crate::utils::time::format_report_ts;
use serde::Serialize;

pub const NOT_YET: &str = "Not yet";
pub const IN_PROGRESS: &str = "In progress";
pub const ONGOING: &str = "ongoing";

/// Flat, string-only view of a report row, shared by every output format.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportExport {
    pub user_id: String,
    pub name: String,
    pub clock_in: String,
    pub clock_out: String,
    pub breaks: String,
    pub total_break: String,
    pub total_work: String,
}

impl From<&ReportRow> for ReportExport {
    fn from(row: &ReportRow) -> Self {
        Self {
            user_id: row.user_id.clone(),
            name: row.name.clone(),
            clock_in: format_report_ts(row.clock_in),
            clock_out: row
                .clock_out
                .map(format_report_ts)
                .unwrap_or_else(|| NOT_YET.to_string()),
            breaks: format_breaks(&row.breaks),
            total_break: secs2hms(row.total_break.num_seconds()),
            total_work: match row.work {
                WorkDuration::Completed(d) => secs2hms(d.num_seconds()),
                WorkDuration::InProgress => IN_PROGRESS.to_string(),
            },
        }
    }
}

/// `10:00:00 - 10:15:00; 14:02:11 - ongoing`
pub fn format_breaks(breaks: &[BreakSpan]) -> String {
    breaks
        .iter()
        .map(|b| match b {
            BreakSpan::Closed { start, end } => {
                format!("{} - {}", start.format("%H:%M:%S"), end.format("%H:%M:%S"))
            }
            BreakSpan::Ongoing { start } => format!("{} - {}", start.format("%H:%M:%S"), ONGOING),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Header per CSV / XLSX / tabella
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "User ID",
        "Name",
        "Clock In",
        "Clock Out",
        "Breaks",
        "Total Break Time",
        "Total Work Time",
    ]
}

pub(crate) fn export_to_row(e: &ReportExport) -> Vec<String> {
    vec![
        e.user_id.clone(),
        e.name.clone(),
        e.clock_in.clone(),
        e.clock_out.clone(),
        e.breaks.clone(),
        e.total_break.clone(),
        e.total_work.clone(),
    ]
}

pub fn rows_to_exports(rows: &[ReportRow]) -> Vec<ReportExport> {
    rows.iter().map(ReportExport::from).collect()
}
