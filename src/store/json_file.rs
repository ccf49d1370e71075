//! JSON file snapshot backend.
//!
//! The file holds the whole store as a map `user_id -> record`, the layout of
//! existing `time_data.json` files. Writes go to a sibling temp file which
//! is then renamed over the store file, so a crash mid-write leaves the previous
//! snapshot intact. Writers hold an exclusive lock on `<name>.json.lock`
//! from reload to rename, so concurrent processes never overwrite each
//! other. The audit log is appended to `<name>.log.jsonl`.

use super::backend::{LogEntry, Mutation, SnapshotBackend};
use crate::errors::{AppError, AppResult};
use crate::models::Snapshot;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct JsonFileBackend {
    path: PathBuf,
    log_path: PathBuf,
}

impl JsonFileBackend {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let log_path = path.with_extension("log.jsonl");
        Ok(Self { path, log_path })
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    /// Block until this process holds the writer lock. Released when the
    /// returned handle is dropped.
    fn lock_writers(&self) -> AppResult<File> {
        let lock_path = self.path.with_extension("json.lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| AppError::Persistence(format!("{}: {e}", lock_path.display())))?;
        file.lock()
            .map_err(|e| AppError::Persistence(format!("cannot lock {}: {e}", lock_path.display())))?;
        Ok(file)
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> AppResult<()> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| AppError::Persistence(format!("JSON serialization error: {e}")))?;

        self.write_atomically(json.as_bytes()).map_err(|e| {
            let _ = fs::remove_file(self.temp_path());
            AppError::Persistence(format!("{}: {e}", self.path.display()))
        })
    }

    fn write_atomically(&self, contents: &[u8]) -> std::io::Result<()> {
        let tmp = self.temp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(contents)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

impl SnapshotBackend for JsonFileBackend {
    fn load(&mut self) -> AppResult<Snapshot> {
        if !self.path.exists() {
            return Ok(Snapshot::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Snapshot::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            AppError::CorruptSnapshot(format!("{}: {e}", self.path.display()))
        })
    }

    fn persist(&mut self, snapshot: &Snapshot) -> AppResult<()> {
        let _lock = self.lock_writers()?;
        self.write_snapshot(snapshot)
    }

    fn update(&mut self, mutation: &mut Mutation<'_>) -> AppResult<Snapshot> {
        let _lock = self.lock_writers()?;

        let mut next = self.load()?;
        if mutation(&mut next)? {
            self.write_snapshot(&next)?;
        }
        Ok(next)
    }

    fn log(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        // ids come from the line count, so appends are serialized too
        let _lock = self.lock_writers()?;
        let id = self.log_entries()?.len() as i64 + 1;
        let entry = LogEntry {
            id,
            date: Local::now().to_rfc3339(),
            operation: operation.to_string(),
            target: target.to_string(),
            message: message.to_string(),
        };
        let line = serde_json::to_string(&entry).map_err(|e| AppError::Other(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn log_entries(&mut self) -> AppResult<Vec<LogEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.log_path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: LogEntry = serde_json::from_str(&line).map_err(|e| {
                AppError::Other(format!("{}: {e}", self.log_path.display()))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn location(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}
