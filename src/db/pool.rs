//! SQLite connection wrapper (lightweight for CLI usage).

use crate::utils::path::expand_tilde;
use rusqlite::{Connection, Result};
use std::fs;

pub struct DbPool {
    pub conn: Connection,
    pub path: String,
}

impl DbPool {
    /// Open (or create) the database file, creating its parent directory if needed.
    pub fn new(path: &str) -> Result<Self> {
        let resolved = expand_tilde(path);
        if let Some(parent) = resolved.parent()
            && !parent.as_os_str().is_empty()
        {
            let _ = fs::create_dir_all(parent);
        }
        let conn = Connection::open(&resolved)?;
        Ok(Self {
            conn,
            path: resolved.to_string_lossy().to_string(),
        })
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: ":memory:".to_string(),
        })
    }
}
