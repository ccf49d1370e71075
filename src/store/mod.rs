//! Session store: owns every session record and enforces the clock/break
//! state machine. Operations are serialized behind one lock inside the
//! process, and every mutation runs through `SnapshotBackend::update`, which
//! reloads the durable snapshot and writes the result under a storage-level
//! lock. Several `timeclock` processes can therefore share one store file.

pub mod backend;
pub mod clock;
pub mod json_file;
pub mod memory;

pub use backend::{LogEntry, Mutation, SnapshotBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

use crate::config::{Config, StorageBackend};
use crate::db::backend::SqliteBackend;
use crate::errors::{AppError, AppResult};
use crate::models::{SessionRecord, SessionStatus, Snapshot};
use crate::ui::messages::warning;
use crate::utils::time::to_iso;
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex, MutexGuard};

/// Open the backend selected by the configuration.
pub fn open_backend(cfg: &Config) -> AppResult<Box<dyn SnapshotBackend>> {
    match cfg.backend {
        StorageBackend::Sqlite => Ok(Box::new(SqliteBackend::open(&cfg.storage)?)),
        StorageBackend::Json => Ok(Box::new(JsonFileBackend::open(&cfg.storage)?)),
    }
}

struct StoreInner {
    records: Snapshot,
    backend: Box<dyn SnapshotBackend>,
}

impl StoreInner {
    /// Pick up whatever other writers persisted since the last operation.
    fn refresh(&mut self) -> AppResult<()> {
        let latest = self.backend.load()?;
        latest.validate()?;
        self.records = latest;
        Ok(())
    }

    /// Apply `mutation` to the latest durable snapshot and adopt the stored result.
    /// On any error the in-memory records stay as they were.
    fn update<F>(&mut self, mut mutation: F) -> AppResult<()>
    where
        F: FnMut(&mut Snapshot) -> AppResult<bool>,
    {
        let stored = self.backend.update(&mut |snapshot: &mut Snapshot| {
            snapshot.validate()?;
            mutation(snapshot)
        })?;
        self.records = stored;
        Ok(())
    }

    fn audit(&mut self, operation: &str, target: &str, message: &str) {
        if let Err(e) = self.backend.log(operation, target, message) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }
}

pub struct SessionStore {
    inner: Mutex<StoreInner>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Load the last persisted snapshot from `backend` and take ownership of it.
    pub fn open(mut backend: Box<dyn SnapshotBackend>, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let records = backend.load()?;
        records.validate()?;

        Ok(Self {
            inner: Mutex::new(StoreInner { records, backend }),
            clock,
        })
    }

    /// Open the configured backend with the system clock.
    pub fn open_with_config(cfg: &Config) -> AppResult<Self> {
        Self::open(open_backend(cfg)?, Arc::new(SystemClock))
    }

    pub fn close(self) -> AppResult<()> {
        let inner = self
            .inner
            .into_inner()
            .map_err(|_| AppError::Other("session store lock poisoned".into()))?;
        inner.backend.close()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, StoreInner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Other("session store lock poisoned".into()))
    }

    /// Return the user's record, creating (and persisting) an empty one on first contact.
    /// The display name of an existing record is never changed.
    pub fn ensure(&self, user_id: &str, display_name: &str) -> AppResult<SessionRecord> {
        let mut inner = self.lock()?;

        let mut inserted = false;
        inner.update(|snapshot| {
            inserted = !snapshot.contains(user_id);
            if inserted {
                snapshot.insert(user_id, SessionRecord::new(display_name));
            }
            Ok(inserted)
        })?;

        if inserted {
            inner.audit("register", user_id, &format!("Registered '{display_name}'"));
        }

        inner
            .records
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::Other(format!("record for {user_id} vanished after ensure")))
    }

    pub fn clock_in(&self, user_id: &str) -> AppResult<NaiveDateTime> {
        self.transition(
            user_id,
            "clock_in",
            |id| AppError::UnknownUser(id.to_string()),
            SessionRecord::clock_in,
        )
    }

    pub fn clock_out(&self, user_id: &str) -> AppResult<NaiveDateTime> {
        self.transition(
            user_id,
            "clock_out",
            |_| AppError::NotClockedIn,
            SessionRecord::clock_out,
        )
    }

    pub fn start_break(&self, user_id: &str) -> AppResult<NaiveDateTime> {
        self.transition(
            user_id,
            "break_start",
            |_| AppError::NotClockedIn,
            SessionRecord::start_break,
        )
    }

    pub fn end_break(&self, user_id: &str) -> AppResult<NaiveDateTime> {
        self.transition(
            user_id,
            "break_end",
            |_| AppError::NoActiveBreak,
            SessionRecord::end_break,
        )
    }

    /// Apply one transition to the latest stored record and persist it.
    /// `missing` builds the error returned when the user has no record yet.
    fn transition<F>(
        &self,
        user_id: &str,
        operation: &str,
        missing: fn(&str) -> AppError,
        apply: F,
    ) -> AppResult<NaiveDateTime>
    where
        F: Fn(&mut SessionRecord, NaiveDateTime) -> AppResult<()>,
    {
        let mut inner = self.lock()?;
        let now = self.clock.now();

        inner.update(|snapshot| {
            let record = snapshot.get_mut(user_id).ok_or_else(|| missing(user_id))?;
            apply(record, now)?;
            Ok(true)
        })?;

        inner.audit(operation, user_id, &format!("{} at {}", operation, to_iso(now)));
        Ok(now)
    }

    pub fn status_of(&self, user_id: &str) -> AppResult<SessionStatus> {
        let mut inner = self.lock()?;
        inner.refresh()?;
        let record = inner.records.get(user_id).ok_or(AppError::NotClockedIn)?;
        let clock_in = record.clock_in.ok_or(AppError::NotClockedIn)?;

        Ok(SessionStatus {
            name: record.name.clone(),
            clock_in,
            clock_out: record.clock_out,
            active_break: record.active_break().map(|b| b.start),
        })
    }

    /// Drop every record. The caller is responsible for confirming first.
    pub fn reset_all(&self) -> AppResult<()> {
        let mut inner = self.lock()?;

        let mut removed = 0;
        inner.update(|snapshot| {
            removed = snapshot.len();
            snapshot.clear();
            Ok(true)
        })?;

        inner.audit("reset", "", &format!("Removed {removed} session records"));
        Ok(())
    }

    /// Point-in-time copy of every record. The lock is released on return.
    pub fn snapshot(&self) -> AppResult<Snapshot> {
        let mut inner = self.lock()?;
        inner.refresh()?;
        Ok(inner.records.clone())
    }

    pub fn log_entries(&self) -> AppResult<Vec<LogEntry>> {
        self.lock()?.backend.log_entries()
    }

    /// Record a dispatcher-level event (backup, init…) in the audit log.
    pub fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.lock()?.backend.log(operation, target, message)
    }

    pub fn location(&self) -> AppResult<String> {
        Ok(self.lock()?.backend.location())
    }
}
