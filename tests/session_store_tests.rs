use chrono::TimeDelta;
use std::sync::Arc;
use timeclock::errors::AppError;
use timeclock::models::{BreakInterval, SessionRecord, Snapshot};
use timeclock::store::{ManualClock, MemoryBackend, SessionStore};

mod common;
use common::{at, harness};

#[test]
fn test_ensure_creates_empty_record_once() {
    let h = harness();

    let rec = h.store.ensure("42", "alice#0001").unwrap();
    assert_eq!(rec, SessionRecord::new("alice#0001"));
    assert_eq!(h.backend.write_count(), 1);

    // second call: same record, name unchanged, nothing written
    let again = h.store.ensure("42", "renamed").unwrap();
    assert_eq!(again.name, "alice#0001");
    assert_eq!(h.backend.write_count(), 1);
    assert_eq!(h.backend.persisted().get("42").unwrap().name, "alice#0001");
}

#[test]
fn test_full_day_transitions() {
    let h = harness();
    h.store.ensure("u1", "Alice").unwrap();

    assert_eq!(h.store.clock_in("u1").unwrap(), at(9, 0, 0));

    h.clock.set(at(10, 0, 0));
    h.store.start_break("u1").unwrap();

    let status = h.store.status_of("u1").unwrap();
    assert!(status.is_on_break());
    assert_eq!(status.active_break, Some(at(10, 0, 0)));

    h.clock.set(at(10, 15, 0));
    h.store.end_break("u1").unwrap();

    h.clock.set(at(17, 0, 0));
    h.store.clock_out("u1").unwrap();

    let status = h.store.status_of("u1").unwrap();
    assert_eq!(status.clock_in, at(9, 0, 0));
    assert_eq!(status.clock_out, Some(at(17, 0, 0)));
    assert!(!status.is_on_break());

    let rec = h.backend.persisted().get("u1").cloned().unwrap();
    assert_eq!(rec.breaks, vec![BreakInterval::closed(at(10, 0, 0), at(10, 15, 0))]);
}

#[test]
fn test_clock_in_twice_fails() {
    let h = harness();
    h.store.ensure("u1", "Alice").unwrap();
    h.store.clock_in("u1").unwrap();

    h.clock.advance(TimeDelta::minutes(5));
    assert!(matches!(h.store.clock_in("u1"), Err(AppError::AlreadyClockedIn)));
    assert_eq!(h.store.status_of("u1").unwrap().clock_in, at(9, 0, 0));
}

#[test]
fn test_clock_in_unknown_user() {
    let h = harness();
    assert!(matches!(h.store.clock_in("ghost"), Err(AppError::UnknownUser(id)) if id == "ghost"));
}

#[test]
fn test_clock_out_preconditions() {
    let h = harness();

    assert!(matches!(h.store.clock_out("nobody"), Err(AppError::NotClockedIn)));

    h.store.ensure("u1", "Alice").unwrap();
    assert!(matches!(h.store.clock_out("u1"), Err(AppError::NotClockedIn)));

    h.store.clock_in("u1").unwrap();
    h.store.clock_out("u1").unwrap();
    assert!(matches!(h.store.clock_out("u1"), Err(AppError::AlreadyClockedOut)));
}

#[test]
fn test_clock_out_during_break_is_rejected_and_state_unchanged() {
    let h = harness();
    h.store.ensure("b", "Bob").unwrap();
    h.store.clock_in("b").unwrap();
    h.clock.set(at(12, 0, 0));
    h.store.start_break("b").unwrap();

    let before = h.store.snapshot().unwrap();
    let writes = h.backend.write_count();

    h.clock.set(at(12, 30, 0));
    assert!(matches!(h.store.clock_out("b"), Err(AppError::BreakInProgress)));

    assert_eq!(h.store.snapshot().unwrap(), before);
    assert_eq!(h.backend.persisted(), before);
    assert_eq!(h.backend.write_count(), writes);
}

#[test]
fn test_start_break_preconditions() {
    let h = harness();
    assert!(matches!(h.store.start_break("x"), Err(AppError::NotClockedIn)));

    h.store.ensure("u1", "Alice").unwrap();
    assert!(matches!(h.store.start_break("u1"), Err(AppError::NotClockedIn)));

    h.store.clock_in("u1").unwrap();
    h.store.start_break("u1").unwrap();
    assert!(matches!(h.store.start_break("u1"), Err(AppError::BreakAlreadyActive)));

    h.store.end_break("u1").unwrap();
    h.store.clock_out("u1").unwrap();
    assert!(matches!(h.store.start_break("u1"), Err(AppError::AlreadyClockedOut)));
}

#[test]
fn test_end_break_without_active_break() {
    let h = harness();
    assert!(matches!(h.store.end_break("x"), Err(AppError::NoActiveBreak)));

    h.store.ensure("u1", "Alice").unwrap();
    h.store.clock_in("u1").unwrap();
    assert!(matches!(h.store.end_break("u1"), Err(AppError::NoActiveBreak)));
}

#[test]
fn test_end_then_start_break_gives_two_breaks() {
    let h = harness();
    h.store.ensure("u1", "Alice").unwrap();
    h.store.clock_in("u1").unwrap();

    h.clock.set(at(10, 0, 0));
    h.store.start_break("u1").unwrap();
    h.clock.set(at(10, 10, 0));
    h.store.end_break("u1").unwrap();

    let between = h.store.snapshot().unwrap();
    assert!(between.get("u1").unwrap().active_break().is_none());

    h.store.start_break("u1").unwrap();

    let rec = h.store.snapshot().unwrap().get("u1").cloned().unwrap();
    assert_eq!(rec.breaks.len(), 2);
    assert_eq!(rec.breaks[0], BreakInterval::closed(at(10, 0, 0), at(10, 10, 0)));
    assert_eq!(rec.breaks[1], BreakInterval::started_at(at(10, 10, 0)));
    assert_eq!(rec.active_break_index(), Some(1));
}

#[test]
fn test_status_requires_clock_in() {
    let h = harness();
    assert!(matches!(h.store.status_of("u1"), Err(AppError::NotClockedIn)));

    h.store.ensure("u1", "Alice").unwrap();
    assert!(matches!(h.store.status_of("u1"), Err(AppError::NotClockedIn)));
}

#[test]
fn test_reset_all_clears_everything() {
    let h = harness();
    for id in ["a", "b", "c"] {
        h.store.ensure(id, id).unwrap();
        h.store.clock_in(id).unwrap();
    }
    h.store.start_break("b").unwrap();

    h.store.reset_all().unwrap();

    assert!(h.store.snapshot().unwrap().is_empty());
    assert!(h.backend.persisted().is_empty());
    for id in ["a", "b", "c"] {
        assert!(matches!(h.store.status_of(id), Err(AppError::NotClockedIn)));
    }

    // reset on an empty store still succeeds
    h.store.reset_all().unwrap();
}

#[test]
fn test_users_do_not_interfere() {
    let h = harness();
    h.store.ensure("a", "A").unwrap();
    h.store.ensure("b", "B").unwrap();
    h.store.clock_in("a").unwrap();
    h.store.start_break("a").unwrap();

    assert!(matches!(h.store.start_break("b"), Err(AppError::NotClockedIn)));
    h.store.clock_in("b").unwrap();
    h.store.start_break("b").unwrap();
    h.store.end_break("a").unwrap();

    let snap = h.store.snapshot().unwrap();
    assert!(snap.get("a").unwrap().active_break().is_none());
    assert!(snap.get("b").unwrap().active_break().is_some());
}

#[test]
fn test_failed_persist_leaves_state_untouched() {
    let h = harness();
    h.store.ensure("u1", "Alice").unwrap();
    let before = h.store.snapshot().unwrap();

    h.backend.fail_writes(true);
    assert!(matches!(h.store.clock_in("u1"), Err(AppError::Persistence(_))));
    assert!(matches!(h.store.ensure("u2", "Bob"), Err(AppError::Persistence(_))));
    assert!(matches!(h.store.reset_all(), Err(AppError::Persistence(_))));

    assert_eq!(h.store.snapshot().unwrap(), before);
    assert_eq!(h.backend.persisted(), before);
    assert!(matches!(h.store.status_of("u1"), Err(AppError::NotClockedIn)));

    h.backend.fail_writes(false);
    h.store.clock_in("u1").unwrap();
    assert_eq!(h.backend.persisted().get("u1").unwrap().clock_in, Some(at(9, 0, 0)));
}

#[test]
fn test_every_success_is_written_through() {
    let h = harness();
    h.store.ensure("u1", "Alice").unwrap();
    h.store.clock_in("u1").unwrap();
    h.store.start_break("u1").unwrap();
    h.store.end_break("u1").unwrap();
    h.store.clock_out("u1").unwrap();

    assert_eq!(h.backend.write_count(), 5);
    assert_eq!(h.backend.persisted(), h.store.snapshot().unwrap());

    let ops: Vec<String> = h
        .store
        .log_entries()
        .unwrap()
        .into_iter()
        .map(|e| e.operation)
        .collect();
    assert_eq!(
        ops,
        vec!["register", "clock_in", "break_start", "break_end", "clock_out"]
    );
}

#[test]
fn test_reopen_restores_last_snapshot_and_close_releases_backend() {
    let h = harness();
    h.store.ensure("u1", "Alice").unwrap();
    h.store.clock_in("u1").unwrap();
    h.store.start_break("u1").unwrap();
    let expected = h.store.snapshot().unwrap();
    h.store.close().unwrap();
    assert!(h.backend.is_closed());

    let clock = Arc::new(ManualClock::new(at(11, 0, 0)));
    let reopened = SessionStore::open(Box::new(h.backend.clone()), clock).unwrap();
    assert_eq!(reopened.snapshot().unwrap(), expected);

    reopened.end_break("u1").unwrap();
    let rec = reopened.snapshot().unwrap().get("u1").cloned().unwrap();
    assert_eq!(rec.breaks[0].end, Some(at(11, 0, 0)));
}

#[test]
fn test_open_rejects_snapshot_with_two_active_breaks() {
    let mut rec = SessionRecord::new("Broken");
    rec.clock_in = Some(at(9, 0, 0));
    rec.breaks.push(BreakInterval::started_at(at(10, 0, 0)));
    rec.breaks.push(BreakInterval::started_at(at(11, 0, 0)));

    let mut snapshot = Snapshot::new();
    snapshot.insert("x", rec);

    let backend = MemoryBackend::with_snapshot(snapshot);
    let clock = Arc::new(ManualClock::new(at(12, 0, 0)));
    let result = SessionStore::open(Box::new(backend), clock);
    assert!(matches!(result, Err(AppError::CorruptSnapshot(_))));
}

#[derive(Clone, Copy, Debug)]
enum Op {
    ClockIn,
    ClockOut,
    StartBreak,
    EndBreak,
}

const OPS: [Op; 4] = [Op::ClockIn, Op::ClockOut, Op::StartBreak, Op::EndBreak];

/// Every sequence of up to five operations keeps the invariants, and a
/// rejected operation never changes the stored record.
#[test]
fn test_invariants_hold_for_all_short_sequences() {
    let len = 5;
    let total = OPS.len().pow(len as u32);

    for n in 0..total {
        let h = harness();
        h.store.ensure("u", "U").unwrap();

        let mut code = n;
        let mut trail = Vec::new();
        for _ in 0..len {
            let op = OPS[code % OPS.len()];
            code /= OPS.len();
            trail.push(op);

            h.clock.advance(TimeDelta::minutes(7));
            let before = h.store.snapshot().unwrap();

            let result = match op {
                Op::ClockIn => h.store.clock_in("u"),
                Op::ClockOut => h.store.clock_out("u"),
                Op::StartBreak => h.store.start_break("u"),
                Op::EndBreak => h.store.end_break("u"),
            };

            let after = h.store.snapshot().unwrap();
            if result.is_err() {
                assert_eq!(before, after, "rejected op changed state: {trail:?}");
            }

            let rec = after.get("u").unwrap();
            let open = rec.breaks.iter().filter(|b| b.is_active()).count();
            assert!(open <= 1, "more than one open break after {trail:?}");
            if rec.clock_out.is_some() {
                assert_eq!(open, 0, "clocked out during a break after {trail:?}");
                assert!(rec.clock_in.is_some());
            }
            assert!(rec.check_invariants().is_ok(), "{trail:?}");
            assert!(
                rec.breaks.len() >= before.get("u").unwrap().breaks.len(),
                "break removed after {trail:?}"
            );
        }
    }
}

#[test]
fn test_concurrent_users_are_serialized() {
    let h = harness();
    let store = Arc::new(h.store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let id = format!("user{i}");
                store.ensure(&id, &id).unwrap();
                store.clock_in(&id).unwrap();
                for _ in 0..10 {
                    store.start_break(&id).unwrap();
                    store.end_break(&id).unwrap();
                }
                store.clock_out(&id).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snap = store.snapshot().unwrap();
    assert_eq!(snap.len(), 8);
    for (_, rec) in snap.iter() {
        assert_eq!(rec.breaks.len(), 10);
        assert!(rec.clock_out.is_some());
    }
    assert_eq!(h.backend.persisted(), snap);
}
