use crate::errors::{AppError, AppResult};
use crate::models::{BreakInterval, SessionRecord, Snapshot};
use crate::utils::time::{parse_iso, parse_optional_iso, to_iso};
use rusqlite::{Connection, params};

/// Rebuild the full snapshot from the `sessions` and `breaks` tables.
pub fn load_snapshot(conn: &Connection) -> AppResult<Snapshot> {
    let mut snapshot = Snapshot::new();

    let mut stmt = conn.prepare_cached(
        "SELECT user_id, name, clock_in, clock_out FROM sessions ORDER BY user_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    for r in rows {
        let (user_id, name, clock_in, clock_out) = r?;
        let record = SessionRecord {
            name,
            clock_in: parse_optional_iso(clock_in.as_deref())?,
            clock_out: parse_optional_iso(clock_out.as_deref())?,
            breaks: Vec::new(),
        };
        snapshot.insert(user_id, record);
    }

    let mut stmt = conn.prepare_cached(
        "SELECT user_id, started_at, ended_at FROM breaks ORDER BY user_id, position",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    for r in rows {
        let (user_id, start, end) = r?;
        let record = snapshot.get_mut(&user_id).ok_or_else(|| {
            AppError::CorruptSnapshot(format!("break recorded for unknown user {user_id}"))
        })?;
        record.breaks.push(BreakInterval {
            start: parse_iso(&start)?,
            end: parse_optional_iso(end.as_deref())?,
        });
    }

    Ok(snapshot)
}

/// Replace the stored sessions with `snapshot` inside a single transaction.
/// Nothing is visible to a later reader unless the commit succeeds.
pub fn replace_snapshot(conn: &mut Connection, snapshot: &Snapshot) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    write_snapshot(&tx, snapshot)?;
    tx.commit()
}

/// Overwrite both tables with `snapshot`. Must run inside a transaction.
pub fn write_snapshot(conn: &Connection, snapshot: &Snapshot) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM breaks", [])?;
    conn.execute("DELETE FROM sessions", [])?;

    {
        let mut insert_session = conn.prepare_cached(
            "INSERT INTO sessions (user_id, name, clock_in, clock_out)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut insert_break = conn.prepare_cached(
            "INSERT INTO breaks (user_id, position, started_at, ended_at)
             VALUES (?1, ?2, ?3, ?4)",
        )?;

        for (user_id, record) in snapshot.iter() {
            insert_session.execute(params![
                user_id,
                record.name,
                record.clock_in.map(to_iso),
                record.clock_out.map(to_iso),
            ])?;

            for (position, b) in record.breaks.iter().enumerate() {
                insert_break.execute(params![
                    user_id,
                    position as i64,
                    to_iso(b.start),
                    b.end.map(to_iso),
                ])?;
            }
        }
    }

    Ok(())
}
