#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use async_trait::async_trait;
use rshiftclock::db::store::SnapshotStore;
use rshiftclock::errors::{AppError, AppResult};
use rshiftclock::ledger::LedgerClient;
use rshiftclock::models::ledger_record::LedgerRecord;
use rshiftclock::models::snapshot::PersistedSnapshot;
use rshiftclock::models::spreadsheet::{SheetValidity, SpreadsheetRef};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Notify;

// ------------------------------------------------
// CLI helpers
// ------------------------------------------------

/// Binary under test with HOME pointed at an isolated directory,
/// so the config file never touches the real user profile.
pub fn rsc(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("rshiftclock");
    cmd.env("HOME", home).env("APPDATA", home);
    cmd
}

/// Scratch HOME plus a database path inside it.
pub fn setup_test_db(name: &str) -> (TempDir, String) {
    let dir = tempfile::Builder::new()
        .prefix(name)
        .tempdir()
        .expect("tempdir");
    let db: PathBuf = dir.path().join(format!("{}_rshiftclock.sqlite", name));
    let db_path = db.to_string_lossy().to_string();
    (dir, db_path)
}

/// Write a config file for the isolated HOME.
pub fn write_config(home: &Path, yaml: &str) {
    let dir = home.join(".rshiftclock");
    std::fs::create_dir_all(&dir).expect("config dir");
    std::fs::write(dir.join("rshiftclock.conf"), yaml).expect("config file");
}

// ------------------------------------------------
// Deterministic clock
// ------------------------------------------------

thread_local! {
    static NOW: Cell<i64> = const { Cell::new(0) };
}

pub fn set_now(ms: i64) {
    NOW.with(|n| n.set(ms));
}

pub fn test_clock() -> i64 {
    NOW.with(|n| n.get())
}

// ------------------------------------------------
// In-memory snapshot store
// ------------------------------------------------

#[derive(Default)]
struct MemoryInner {
    saved: Option<PersistedSnapshot>,
    saves: usize,
    fail_writes: bool,
    audit: Vec<(String, String, String)>,
}

/// Cloneable handle: the engine owns one clone, the test inspects another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn with_snapshot(snapshot: PersistedSnapshot) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().saved = Some(snapshot);
        store
    }

    pub fn saved(&self) -> Option<PersistedSnapshot> {
        self.inner.lock().unwrap().saved.clone()
    }

    pub fn saves(&self) -> usize {
        self.inner.lock().unwrap().saves
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    pub fn audited(&self, operation: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .audit
            .iter()
            .filter(|(op, _, _)| op == operation)
            .count()
    }

    pub fn boxed(&self) -> Box<dyn SnapshotStore> {
        Box::new(self.clone())
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&mut self) -> Option<PersistedSnapshot> {
        self.saved()
    }

    fn save(&mut self, snapshot: &PersistedSnapshot) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(AppError::PersistenceWrite("quota exceeded".into()));
        }
        inner.saved = Some(snapshot.clone());
        inner.saves += 1;
        Ok(())
    }

    fn audit(&mut self, operation: &str, target: &str, message: &str) {
        self.inner.lock().unwrap().audit.push((
            operation.to_string(),
            target.to_string(),
            message.to_string(),
        ));
    }
}

// ------------------------------------------------
// Scripted ledger
// ------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Fail,
    Stale,
}

/// Holds an append until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub started: Notify,
    release: Notify,
}

#[derive(Default)]
pub struct ScriptedLedger {
    calls: AtomicUsize,
    recorded: Mutex<Vec<LedgerRecord>>,
    replies: Mutex<HashMap<String, Reply>>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
    validity: Mutex<Option<SheetValidity>>,
}

impl ScriptedLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reply used for appends of shifts belonging to `name`.
    pub fn reply_for(&self, name: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(name.to_string(), reply);
    }

    /// Make appends for `name` wait until [`release`](Self::release) is called.
    pub fn gate(&self, name: &str) -> Arc<Gate> {
        self.gates
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    pub fn release(&self, name: &str) {
        self.gate(name).release.notify_one();
    }

    pub fn set_validity(&self, validity: SheetValidity) {
        *self.validity.lock().unwrap() = Some(validity);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<LedgerRecord> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn append_record(&self, sheet: &SpreadsheetRef, record: &LedgerRecord) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().get(&record.name).cloned();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&record.name)
            .copied()
            .unwrap_or(Reply::Ok);

        match reply {
            Reply::Ok => {
                self.recorded.lock().unwrap().push(record.clone());
                Ok(())
            }
            Reply::Fail => Err(AppError::Other("network unreachable".into())),
            Reply::Stale => Err(AppError::StaleSpreadsheet(
                sheet.id.clone().unwrap_or_default(),
            )),
        }
    }

    async fn validate_spreadsheet(&self, _sheet: &SpreadsheetRef) -> AppResult<SheetValidity> {
        Ok(self.validity.lock().unwrap().unwrap_or(SheetValidity::Valid))
    }
}
