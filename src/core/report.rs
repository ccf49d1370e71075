//! Worked/break time aggregation over a snapshot.

use crate::errors::{AppError, AppResult};
use crate::models::{SessionRecord, Snapshot};
use chrono::{NaiveDateTime, TimeDelta};

/// One break as shown in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakSpan {
    Closed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Ongoing {
        start: NaiveDateTime,
    },
}

impl BreakSpan {
    pub fn start(&self) -> NaiveDateTime {
        match self {
            BreakSpan::Closed { start, .. } | BreakSpan::Ongoing { start } => *start,
        }
    }
}

/// Worked time of a row. A session that is still open has no number yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkDuration {
    Completed(TimeDelta),
    InProgress,
}

impl WorkDuration {
    pub fn seconds(&self) -> Option<i64> {
        match self {
            WorkDuration::Completed(d) => Some(d.num_seconds()),
            WorkDuration::InProgress => None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, WorkDuration::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub user_id: String,
    pub name: String,
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
    pub breaks: Vec<BreakSpan>,
    pub total_break: TimeDelta,
    pub work: WorkDuration,
}

pub struct ReportBuilder;

impl ReportBuilder {
    /// Build one row per user that has clocked in, ordered by clock-in time
    /// (ties by user id). Fails with `NoDataAvailable` when there is no such user.
    pub fn build(snapshot: &Snapshot) -> AppResult<Vec<ReportRow>> {
        let mut rows: Vec<ReportRow> = snapshot
            .iter()
            .filter_map(|(user_id, record)| Self::row_for(user_id, record))
            .collect();

        if rows.is_empty() {
            return Err(AppError::NoDataAvailable);
        }

        rows.sort_by(|a, b| {
            a.clock_in
                .cmp(&b.clock_in)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        Ok(rows)
    }

    fn row_for(user_id: &str, record: &SessionRecord) -> Option<ReportRow> {
        let clock_in = record.clock_in?;

        let breaks = record
            .breaks
            .iter()
            .map(|b| match b.end {
                Some(end) => BreakSpan::Closed {
                    start: b.start,
                    end,
                },
                None => BreakSpan::Ongoing { start: b.start },
            })
            .collect();

        let total_break = total_break(record);

        let work = match record.clock_out {
            Some(out) => WorkDuration::Completed((out - clock_in) - total_break),
            None => WorkDuration::InProgress,
        };

        Some(ReportRow {
            user_id: user_id.to_string(),
            name: record.name.clone(),
            clock_in,
            clock_out: record.clock_out,
            breaks,
            total_break,
            work,
        })
    }
}

/// Sum of closed breaks; a break still running counts as zero.
pub fn total_break(record: &SessionRecord) -> TimeDelta {
    record
        .breaks
        .iter()
        .filter_map(|b| b.duration())
        .fold(TimeDelta::zero(), |acc, d| acc + d)
}
