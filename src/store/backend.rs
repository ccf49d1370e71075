//! Durable storage seam for the session store.

use crate::errors::AppResult;
use crate::models::Snapshot;
use serde::{Deserialize, Serialize};

/// One line of the internal audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Change run by `SnapshotBackend::update`; `Ok(false)` means nothing changed
/// and nothing has to be written.
pub type Mutation<'a> = dyn FnMut(&mut Snapshot) -> AppResult<bool> + 'a;

/// Where a `SessionStore` keeps its snapshot.
///
/// `persist` always receives the complete store and must either write all of
/// it or fail with `AppError::Persistence`, leaving no partial state behind.
pub trait SnapshotBackend: Send {
    /// Last persisted snapshot, or an empty one if nothing was written yet.
    fn load(&mut self) -> AppResult<Snapshot>;

    fn persist(&mut self, snapshot: &Snapshot) -> AppResult<()>;

    /// Reload the durable snapshot, apply `mutation` and write the result as
    /// one step. Backends shared between processes must hold an exclusive
    /// lock on the storage for the whole step, so no other writer can slip
    /// in between the reload and the write. An error from `mutation` aborts
    /// without writing. Returns the snapshot now stored.
    fn update(&mut self, mutation: &mut Mutation<'_>) -> AppResult<Snapshot> {
        let mut next = self.load()?;
        if mutation(&mut next)? {
            self.persist(&next)?;
        }
        Ok(next)
    }

    /// Append a line to the internal audit log.
    fn log(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()>;

    fn log_entries(&mut self) -> AppResult<Vec<LogEntry>>;

    /// Human readable location (file path, `:memory:`…).
    fn location(&self) -> String;

    fn close(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
