use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Every other migration records itself there.
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

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
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
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the key-value slot holding the serialized roster snapshot.
fn migrate_create_kv_slot(conn: &Connection, quiet: bool) -> Result<()> {
    let version = "20250301_0001_create_kv_slot";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv_slot (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    mark_applied(conn, version, "Created kv_slot table for roster snapshots")?;
    if !quiet {
        success(format!("Migration applied: {} → created 'kv_slot'", version));
    }
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// `quiet` suppresses the per-migration console output; the audit rows are
/// written either way.
pub fn run_pending_migrations(conn: &Connection, quiet: bool) -> Result<()> {
    ensure_log_table(conn)?;
    migrate_create_kv_slot(conn, quiet)?;
    Ok(())
}
