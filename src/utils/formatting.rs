//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = unicode_width::UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(visible)))
}

/// Seconds as `HH:MM:SS`; hours are not wrapped at 24.
///
/// es: 27900 → "07:45:00", -90 → "-00:01:30"
pub fn secs2hms(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let abs = secs.abs();
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        abs / 3600,
        (abs % 3600) / 60,
        abs % 60
    )
}
