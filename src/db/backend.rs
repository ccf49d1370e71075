//! SQLite snapshot backend (default).
//!
//! Updates run inside `BEGIN IMMEDIATE`: the write lock is taken before the
//! snapshot is reloaded, so concurrent `timeclock` processes on the same
//! database queue up instead of overwriting each other.

use crate::db::initialize::init_db;
use crate::db::log::{load_log, ttlog};
use crate::db::pool::DbPool;
use crate::db::queries::{load_snapshot, replace_snapshot, write_snapshot};
use crate::errors::{AppError, AppResult};
use crate::models::Snapshot;
use crate::store::{LogEntry, Mutation, SnapshotBackend};
use rusqlite::TransactionBehavior;
use std::fs;
use std::path::Path;

pub struct SqliteBackend {
    pool: DbPool,
    location: String,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;

        Ok(Self {
            pool,
            location: path.to_string(),
        })
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;

        Ok(Self {
            pool,
            location: ":memory:".to_string(),
        })
    }
}

impl SnapshotBackend for SqliteBackend {
    fn load(&mut self) -> AppResult<Snapshot> {
        // both tables read from the same committed state
        let tx = self.pool.conn.transaction()?;
        let snapshot = load_snapshot(&tx)?;
        tx.commit()?;
        Ok(snapshot)
    }

    fn persist(&mut self, snapshot: &Snapshot) -> AppResult<()> {
        self.pool
            .with_conn(|conn| replace_snapshot(conn, snapshot))
            .map_err(|e| AppError::Persistence(e.to_string()))
    }

    fn update(&mut self, mutation: &mut Mutation<'_>) -> AppResult<Snapshot> {
        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| AppError::Persistence(format!("cannot lock {}: {e}", self.location)))?;

        // an early return drops `tx`, which rolls back
        let mut next = load_snapshot(&tx)?;
        if mutation(&mut next)? {
            write_snapshot(&tx, &next).map_err(|e| AppError::Persistence(e.to_string()))?;
        }
        tx.commit().map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(next)
    }

    fn log(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&self.pool.conn, operation, target, message)
    }

    fn log_entries(&mut self) -> AppResult<Vec<LogEntry>> {
        load_log(&self.pool.conn)
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn close(self: Box<Self>) -> AppResult<()> {
        self.pool.close()
    }
}
