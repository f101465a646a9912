//! Durable snapshot slot.
//!
//! The roster and settings are serialized to JSON and kept under a single key
//! in the `kv_slot` table. One statement overwrites the slot, so a save is as
//! atomic as SQLite makes a single UPSERT; nothing more is layered on top.

use crate::db::initialize::ensure_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::snapshot::PersistedSnapshot;
use crate::ui::messages::warning;
use chrono::Local;
use rusqlite::{OptionalExtension, params};

/// Key of the snapshot inside `kv_slot`.
pub const SNAPSHOT_KEY: &str = "clock-state";

/// Where the engine keeps its snapshot between runs.
pub trait SnapshotStore: Send {
    /// Read the stored snapshot. Missing or unreadable data yields None.
    fn load(&mut self) -> Option<PersistedSnapshot>;

    /// Overwrite the stored snapshot.
    fn save(&mut self, snapshot: &PersistedSnapshot) -> AppResult<()>;

    /// Append a line to the audit trail. Best effort.
    fn audit(&mut self, _operation: &str, _target: &str, _message: &str) {}
}

pub struct SqliteStore {
    pool: DbPool,
    key: String,
}

impl SqliteStore {
    /// Wrap an open database, running pending migrations first.
    pub fn open(pool: DbPool) -> AppResult<Self> {
        ensure_db(&pool.conn)?;
        Ok(Self {
            pool,
            key: SNAPSHOT_KEY.to_string(),
        })
    }

    pub fn open_path(path: &str) -> AppResult<Self> {
        Self::open(DbPool::new(path)?)
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn read_raw(&self) -> AppResult<Option<String>> {
        let raw = self
            .pool
            .conn
            .query_row(
                "SELECT value FROM kv_slot WHERE key = ?1",
                [&self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }
}

impl SnapshotStore for SqliteStore {
    fn load(&mut self) -> Option<PersistedSnapshot> {
        let raw = match self.read_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warning(format!("Could not read saved roster: {}", e));
                self.audit("snapshot_read_failed", &self.key.clone(), &e.to_string());
                return None;
            }
        };

        match PersistedSnapshot::from_json(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warning(format!("Saved roster is unreadable, starting empty: {}", e));
                self.audit("snapshot_parse_failed", &self.key.clone(), &e.to_string());
                None
            }
        }
    }

    fn save(&mut self, snapshot: &PersistedSnapshot) -> AppResult<()> {
        let json = snapshot.to_json()?;
        self.pool
            .conn
            .execute(
                "INSERT INTO kv_slot (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![self.key, json, Local::now().to_rfc3339()],
            )
            .map_err(|e| AppError::PersistenceWrite(e.to_string()))?;
        Ok(())
    }

    fn audit(&mut self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.pool.conn, operation, target, message) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }
}
