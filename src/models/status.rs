use chrono::NaiveDateTime;
use serde::Serialize;

/// Read-only view of one user's current session, returned by `status_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub name: String,
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
    /// Start of the break in progress, if any.
    pub active_break: Option<NaiveDateTime>,
}

impl SessionStatus {
    pub fn is_on_break(&self) -> bool {
        self.active_break.is_some()
    }
}
