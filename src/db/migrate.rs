use crate::errors::{AppError, AppResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result};

type MigrationFn = fn(&Connection) -> Result<()>;

/// Ordered list of schema migrations: (version, description, step).
/// Applied versions are recorded in the `log` table.
const MIGRATIONS: &[(&str, &str, MigrationFn)] = &[
    (
        "20251019_0001_create_sessions",
        "Created sessions table",
        create_sessions_table,
    ),
    (
        "20251019_0002_create_breaks",
        "Created breaks table",
        create_breaks_table,
    ),
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// One row per user; timestamps are ISO-8601 text, NULL when absent.
fn create_sessions_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            user_id    TEXT PRIMARY KEY,
            name       TEXT NOT NULL,
            clock_in   TEXT,
            clock_out  TEXT
        );
        "#,
    )?;
    Ok(())
}

/// Breaks keep their insertion order through `position`.
fn create_breaks_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS breaks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     TEXT NOT NULL,
            position    INTEGER NOT NULL,
            started_at  TEXT NOT NULL,
            ended_at    TEXT,
            UNIQUE (user_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_breaks_user ON breaks(user_id, position);
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        [Local::now().to_rfc3339().as_str(), version, message],
    )?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invocata da db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn).map_err(|e| AppError::Migration(format!("log table: {e}")))?;

    for (version, message, step) in MIGRATIONS {
        let applied = is_applied(conn, version)
            .map_err(|e| AppError::Migration(format!("{version}: {e}")))?;
        if applied {
            continue;
        }

        step(conn)
            .and_then(|_| mark_applied(conn, version, message))
            .map_err(|e| AppError::Migration(format!("{version}: {e}")))?;
    }

    Ok(())
}
