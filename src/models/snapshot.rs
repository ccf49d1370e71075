use super::session::SessionRecord;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time copy of every session record, keyed by user id.
///
/// Serializes as a plain map `user_id -> record`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: BTreeMap<String, SessionRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<&SessionRecord> {
        self.records.get(user_id)
    }

    pub(crate) fn get_mut(&mut self, user_id: &str) -> Option<&mut SessionRecord> {
        self.records.get_mut(user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.records.contains_key(user_id)
    }

    pub fn insert(&mut self, user_id: impl Into<String>, record: SessionRecord) {
        self.records.insert(user_id.into(), record);
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SessionRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reject snapshots whose records break the session invariants.
    pub fn validate(&self) -> AppResult<()> {
        for (user_id, record) in &self.records {
            record
                .check_invariants()
                .map_err(|reason| AppError::CorruptSnapshot(format!("user {user_id}: {reason}")))?;
        }
        Ok(())
    }
}

impl FromIterator<(String, SessionRecord)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, SessionRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
