//! Timestamp utilities: ISO-8601 conversion for storage, clock formatting for output.

use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use std::fmt::Write;

/// Storage format. `%.f` writes nothing when the fractional part is zero.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Format used in reports and exports.
pub const REPORT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn to_iso(ts: NaiveDateTime) -> String {
    ts.format(ISO_FORMAT).to_string()
}

pub fn parse_iso(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, ISO_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

pub fn parse_optional_iso(s: Option<&str>) -> AppResult<Option<NaiveDateTime>> {
    s.map(parse_iso).transpose()
}

/// Render a timestamp with a user supplied strftime pattern.
/// An invalid pattern falls back to `HH:MM:SS`.
pub fn format_clock(ts: NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", ts.format(pattern)) {
        Ok(()) => out,
        Err(_) => ts.format("%H:%M:%S").to_string(),
    }
}

pub fn format_report_ts(ts: NaiveDateTime) -> String {
    ts.format(REPORT_FORMAT).to_string()
}
