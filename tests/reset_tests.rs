use std::time::{Duration, Instant};
use timeclock::config::Config;
use timeclock::core::reset::{ConfirmationReply, ResetLogic, ScriptedConfirmation};
use timeclock::errors::AppError;

mod common;
use common::{Harness, harness};

fn config_allowing(users: &[&str]) -> Config {
    Config {
        allowed_reset_users: users.iter().map(|u| u.to_string()).collect(),
        ..Config::default()
    }
}

fn populated() -> Harness {
    let h = harness();
    h.store.ensure("admin", "Admin").unwrap();
    h.store.ensure("worker", "Worker").unwrap();
    h.store.clock_in("worker").unwrap();
    h
}

#[test]
fn test_reset_denied_outside_allow_list() {
    let h = populated();
    let cfg = config_allowing(&["admin"]);
    let before = h.store.snapshot().unwrap();

    let mut replies = ScriptedConfirmation::new([ConfirmationReply::new("worker", "confirm")]);
    let mut prompted = false;
    let result = ResetLogic::run(&h.store, &cfg, "worker", &mut replies, |_| prompted = true);

    assert!(matches!(result, Err(AppError::PermissionDenied)));
    assert!(!prompted);
    assert_eq!(h.store.snapshot().unwrap(), before);
}

#[test]
fn test_reset_with_confirmation_clears_store() {
    let h = populated();
    let cfg = config_allowing(&["admin"]);

    let mut replies = ScriptedConfirmation::new([ConfirmationReply::new("admin", "  CONFIRM ")]);
    let mut prompt = String::new();
    ResetLogic::run(&h.store, &cfg, "admin", &mut replies, |p| prompt = p.to_string()).unwrap();

    assert!(prompt.contains("Type 'confirm' to proceed"));
    assert!(h.store.snapshot().unwrap().is_empty());
    assert!(matches!(h.store.status_of("worker"), Err(AppError::NotClockedIn)));
}

#[test]
fn test_reset_ignores_other_authors_and_other_text() {
    let h = populated();
    let cfg = config_allowing(&["admin"]);
    let before = h.store.snapshot().unwrap();

    // someone else confirming, and the requester saying something else, do not count
    let mut replies = ScriptedConfirmation::new([
        ConfirmationReply::new("worker", "confirm"),
        ConfirmationReply::new("admin", "wait what"),
    ]);
    let result = ResetLogic::run(&h.store, &cfg, "admin", &mut replies, |_| {});

    assert!(matches!(result, Err(AppError::ConfirmationTimedOut)));
    assert_eq!(h.store.snapshot().unwrap(), before);
    assert_eq!(h.backend.persisted(), before);
}

#[test]
fn test_reset_keyword_is_configurable() {
    let h = populated();
    let cfg = Config {
        reset_keyword: "wipe".to_string(),
        ..config_allowing(&["admin"])
    };

    let mut replies = ScriptedConfirmation::new([
        ConfirmationReply::new("admin", "confirm"),
        ConfirmationReply::new("admin", "wipe"),
    ]);
    ResetLogic::run(&h.store, &cfg, "admin", &mut replies, |_| {}).unwrap();
    assert!(h.store.snapshot().unwrap().is_empty());
}

#[test]
fn test_await_confirmation_stops_at_first_match() {
    let mut replies = ScriptedConfirmation::new([
        ConfirmationReply::new("admin", "confirm"),
        ConfirmationReply::new("admin", "leftover"),
    ]);
    let deadline = Instant::now() + Duration::from_secs(30);

    ResetLogic::await_confirmation(&mut replies, "admin", "confirm", deadline).unwrap();
    assert!(matches!(
        ResetLogic::await_confirmation(&mut replies, "admin", "confirm", deadline),
        Err(AppError::ConfirmationTimedOut)
    ));
}

#[test]
fn test_confirmation_after_deadline_is_rejected() {
    let h = populated();
    let cfg = Config {
        reset_timeout_secs: 5,
        ..config_allowing(&["admin"])
    };
    let before = h.store.snapshot().unwrap();
    let writes = h.backend.write_count();

    let start = Instant::now();
    let mut replies = ScriptedConfirmation::with_arrivals([(
        start + Duration::from_secs(60),
        ConfirmationReply::new("admin", "confirm"),
    )]);
    let mut prompted = false;
    let result = ResetLogic::run(&h.store, &cfg, "admin", &mut replies, |_| prompted = true);

    assert!(prompted);
    assert!(matches!(result, Err(AppError::ConfirmationTimedOut)));
    assert_eq!(h.store.snapshot().unwrap(), before);
    assert_eq!(h.backend.write_count(), writes);
}

#[test]
fn test_confirmation_before_deadline_is_accepted() {
    let h = populated();
    let cfg = Config {
        reset_timeout_secs: 5,
        ..config_allowing(&["admin"])
    };

    let start = Instant::now();
    let mut replies = ScriptedConfirmation::with_arrivals([
        (start + Duration::from_secs(2), ConfirmationReply::new("admin", "confirm")),
        (start + Duration::from_secs(1), ConfirmationReply::new("worker", "confirm")),
    ]);
    ResetLogic::run(&h.store, &cfg, "admin", &mut replies, |_| {}).unwrap();

    assert!(h.store.snapshot().unwrap().is_empty());
}

#[test]
fn test_await_confirmation_stops_at_deadline() {
    let start = Instant::now();
    let deadline = start + Duration::from_secs(10);
    let mut replies = ScriptedConfirmation::with_arrivals([
        (start + Duration::from_secs(3), ConfirmationReply::new("admin", "not yet")),
        (start + Duration::from_secs(11), ConfirmationReply::new("admin", "confirm")),
    ]);

    assert!(matches!(
        ResetLogic::await_confirmation(&mut replies, "admin", "confirm", deadline),
        Err(AppError::ConfirmationTimedOut)
    ));

    // the late reply is still there for a wait with a later deadline
    let later = start + Duration::from_secs(20);
    ResetLogic::await_confirmation(&mut replies, "admin", "confirm", later).unwrap();
}
