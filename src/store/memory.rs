//! In-memory snapshot backend.
//!
//! Clones share the same state, so a test can keep a handle, inspect what
//! was persisted, inject write failures and reopen a store on the same data.

use super::backend::{LogEntry, Mutation, SnapshotBackend};
use crate::errors::{AppError, AppResult};
use crate::models::Snapshot;
use chrono::Local;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    persisted: Snapshot,
    log: Vec<LogEntry>,
    writes: usize,
    fail_writes: bool,
    closed: bool,
}

impl MemoryState {
    fn write(&mut self, snapshot: &Snapshot) -> AppResult<()> {
        if self.fail_writes {
            return Err(AppError::Persistence("memory backend rejected the write".into()));
        }
        self.persisted = snapshot.clone();
        self.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already holds `snapshot`, as if persisted by an earlier run.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let backend = Self::default();
        backend.state().persisted = snapshot;
        backend
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn persisted(&self) -> Snapshot {
        self.state().persisted.clone()
    }

    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    /// Make every following `persist` fail until switched off again.
    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&mut self) -> AppResult<Snapshot> {
        let mut state = self.state();
        state.closed = false;
        Ok(state.persisted.clone())
    }

    fn persist(&mut self, snapshot: &Snapshot) -> AppResult<()> {
        self.state().write(snapshot)
    }

    /// Runs with the shared state locked, so clones updating concurrently
    /// behave like separate processes on one file.
    fn update(&mut self, mutation: &mut Mutation<'_>) -> AppResult<Snapshot> {
        let mut state = self.state();
        let mut next = state.persisted.clone();
        if mutation(&mut next)? {
            state.write(&next)?;
        }
        Ok(next)
    }

    fn log(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        let mut state = self.state();
        let id = state.log.len() as i64 + 1;
        state.log.push(LogEntry {
            id,
            date: Local::now().to_rfc3339(),
            operation: operation.to_string(),
            target: target.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn log_entries(&mut self) -> AppResult<Vec<LogEntry>> {
        Ok(self.state().log.clone())
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }

    fn close(self: Box<Self>) -> AppResult<()> {
        self.state().closed = true;
        Ok(())
    }
}
