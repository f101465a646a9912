use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn, false)?;
    Ok(())
}

/// Same as [`init_db`] without console output; used on every regular command.
pub fn ensure_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn, true)?;
    Ok(())
}
