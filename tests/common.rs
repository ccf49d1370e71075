#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use timeclock::store::{ManualClock, MemoryBackend, SessionStore};

/// Binary under test, isolated from any real configuration file.
pub fn tc(name: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("timeclock");
    cmd.env("TIMECLOCK_CONFIG", temp_path(&format!("{name}_noconf"), "conf"));
    cmd
}

/// Binary under test, reading the given YAML configuration.
pub fn tc_with_config(name: &str, yaml: &str) -> Command {
    let conf = temp_path(&format!("{name}_conf"), "conf");
    fs::write(&conf, yaml).expect("write config");
    let mut cmd = cargo_bin_cmd!("timeclock");
    cmd.env("TIMECLOCK_CONFIG", &conf);
    cmd
}

/// Unique path inside the system temp dir; any leftover file (and its log) is removed.
pub fn temp_path(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timeclock.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    fs::remove_file(PathBuf::from(&p).with_extension("log.jsonl")).ok();
    p
}

/// Timestamp on a fixed test day.
pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

pub struct Harness {
    pub store: SessionStore,
    pub backend: MemoryBackend,
    pub clock: Arc<ManualClock>,
}

/// Store backed by memory, clock starting at 09:00.
pub fn harness() -> Harness {
    let backend = MemoryBackend::new();
    let clock = Arc::new(ManualClock::new(at(9, 0, 0)));
    let store = SessionStore::open(Box::new(backend.clone()), clock.clone()).expect("open store");
    Harness {
        store,
        backend,
        clock,
    }
}
