use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A pause inside a session. `end == None` means the break is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    pub start: NaiveDateTime,
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
}

impl BreakInterval {
    pub fn started_at(start: NaiveDateTime) -> Self {
        Self { start, end: None }
    }

    pub fn closed(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn is_active(&self) -> bool {
        self.end.is_none()
    }

    /// Length of a closed break; `None` while it is still running.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end.map(|end| end - self.start)
    }
}

/// Session state of one user.
///
/// Field names match the persisted layout (`name`, `clock_in`, `clock_out`,
/// `breaks`), so the struct is serialized as-is by the JSON backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub name: String,
    #[serde(default)]
    pub clock_in: Option<NaiveDateTime>,
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
    #[serde(default)]
    pub breaks: Vec<BreakInterval>,
}

impl SessionRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clock_in: None,
            clock_out: None,
            breaks: Vec::new(),
        }
    }

    pub fn is_clocked_in(&self) -> bool {
        self.clock_in.is_some()
    }

    pub fn is_clocked_out(&self) -> bool {
        self.clock_out.is_some()
    }

    /// Index of the break still running.
    ///
    /// Scans the whole list instead of trusting its order; a record never
    /// holds more than one open break.
    pub fn active_break_index(&self) -> Option<usize> {
        let mut open = self
            .breaks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_active())
            .map(|(i, _)| i);

        let first = open.next();
        debug_assert!(
            open.next().is_none(),
            "session record holds more than one active break"
        );
        first
    }

    pub fn active_break(&self) -> Option<&BreakInterval> {
        self.active_break_index().map(|i| &self.breaks[i])
    }

    // ---------------------------
    // Transitions
    // ---------------------------
    //
    // Each transition checks every precondition before touching a field,
    // so a rejected call leaves the record unchanged.

    pub fn clock_in(&mut self, now: NaiveDateTime) -> AppResult<()> {
        if self.clock_in.is_some() {
            return Err(AppError::AlreadyClockedIn);
        }
        self.clock_in = Some(now);
        Ok(())
    }

    pub fn clock_out(&mut self, now: NaiveDateTime) -> AppResult<()> {
        if self.clock_in.is_none() {
            return Err(AppError::NotClockedIn);
        }
        if self.clock_out.is_some() {
            return Err(AppError::AlreadyClockedOut);
        }
        if self.active_break_index().is_some() {
            return Err(AppError::BreakInProgress);
        }
        self.clock_out = Some(now);
        Ok(())
    }

    pub fn start_break(&mut self, now: NaiveDateTime) -> AppResult<()> {
        if self.clock_in.is_none() {
            return Err(AppError::NotClockedIn);
        }
        if self.active_break_index().is_some() {
            return Err(AppError::BreakAlreadyActive);
        }
        if self.clock_out.is_some() {
            return Err(AppError::AlreadyClockedOut);
        }
        self.breaks.push(BreakInterval::started_at(now));
        Ok(())
    }

    pub fn end_break(&mut self, now: NaiveDateTime) -> AppResult<()> {
        let idx = self.active_break_index().ok_or(AppError::NoActiveBreak)?;
        self.breaks[idx].end = Some(now);
        Ok(())
    }

    /// Check the record-level invariants, describing the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        let open = self.breaks.iter().filter(|b| b.is_active()).count();
        if open > 1 {
            return Err(format!("{open} breaks are open at the same time"));
        }
        if self.clock_in.is_none() && (self.clock_out.is_some() || !self.breaks.is_empty()) {
            return Err("session data present without a clock-in".to_string());
        }
        if self.clock_out.is_some() && open > 0 {
            return Err("clocked out while a break is still open".to_string());
        }
        Ok(())
    }
}
