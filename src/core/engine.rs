//! Shift lifecycle orchestration.
//!
//! Per entry: `Active --clock_out--> PendingSync --append ok--> removed`.
//! A failed append leaves the entry pending; nothing retries on its own.
//! The operator re-attempts with [`ShiftEngine::retry`] or drops the entry
//! with [`ShiftEngine::cancel`].
//!
//! All roster mutations run under one lock that is never held across an
//! `.await`, so the roster stays usable while appends are in flight.
//! Append results are applied in completion order, and a result for an entry
//! that disappeared meanwhile is ignored.

use crate::core::roster::Roster;
use crate::db::store::SnapshotStore;
use crate::errors::{AppError, AppResult};
use crate::ledger::LedgerClient;
use crate::models::ledger_record::LedgerRecord;
use crate::models::shift_entry::{ShiftEntry, ShiftId};
use crate::models::snapshot::PersistedSnapshot;
use crate::models::spreadsheet::{SheetValidity, SpreadsheetRef};
use crate::ui::messages::warning;
use crate::utils::time::now_millis;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Settings persisted alongside the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dark: bool,
    pub spreadsheet: SpreadsheetRef,
}

/// How a delivery attempt ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The ledger has the row; the entry left the roster.
    Recorded(ShiftEntry),
    /// The entry was cancelled while the append was in flight; result ignored.
    Detached(ShiftId),
}

struct EngineState {
    roster: Roster,
    dark: bool,
    spreadsheet: SpreadsheetRef,
    current: Option<ShiftId>,
    in_flight: HashSet<ShiftId>,
    store: Box<dyn SnapshotStore>,
    persist_failures: u64,
}

impl EngineState {
    fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            users: self.roster.entries().to_vec(),
            dark: self.dark,
            spreadsheet: self.spreadsheet.clone(),
            unreadable: Vec::new(),
        }
    }

    /// Write the snapshot. Failures are reported and counted, never returned:
    /// the in-memory roster stays authoritative.
    fn persist(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot) {
            self.persist_failures += 1;
            warning(format!("Roster not saved, changes kept in memory only: {}", e));
            self.store.audit("persist_failed", "", &e.to_string());
        }
    }

    fn audit(&mut self, operation: &str, id: ShiftId, message: &str) {
        self.store.audit(operation, &id.to_string(), message);
    }

    fn forget(&mut self, id: ShiftId) {
        if self.current == Some(id) {
            self.current = None;
        }
    }

    fn stale_reference(&mut self, operation: &str, id: ShiftId) -> AppError {
        self.audit("stale_reference", id, &format!("{} on a shift no longer on the roster", operation));
        AppError::NotFound(id)
    }

    fn clear_spreadsheet_if(&mut self, used: &SpreadsheetRef, reason: &str) -> bool {
        // The operator may have picked another sheet while the request ran.
        if self.spreadsheet.id != used.id {
            return false;
        }
        self.spreadsheet = SpreadsheetRef::unset();
        self.persist();
        self.store
            .audit("spreadsheet_cleared", used.sheet_id().unwrap_or(""), reason);
        true
    }

    fn apply_sync_result(
        &mut self,
        id: ShiftId,
        sheet: &SpreadsheetRef,
        result: AppResult<()>,
    ) -> AppResult<SyncOutcome> {
        if !self.roster.contains(id) {
            let what = if result.is_ok() { "delivered" } else { "failed" };
            warning(format!(
                "Shift {} was removed while being recorded; the {} result was ignored.",
                id, what
            ));
            self.audit("sync_detached", id, what);
            return Ok(SyncOutcome::Detached(id));
        }

        match result {
            Ok(()) => {
                let entry = self.roster.acknowledge(id)?;
                self.forget(id);
                self.persist();
                self.audit(
                    "sync_delivered",
                    id,
                    &format!("{} recorded in '{}'", entry.name, sheet.display_name()),
                );
                Ok(SyncOutcome::Recorded(entry))
            }
            Err(err) => {
                if matches!(err, AppError::StaleSpreadsheet(_)) {
                    self.clear_spreadsheet_if(sheet, &err.to_string());
                }
                let reason = err.to_string();
                self.audit("sync_failed", id, &reason);
                Err(AppError::SyncFailed { id, reason })
            }
        }
    }
}

pub struct ShiftEngine {
    state: Mutex<EngineState>,
    ledger: Arc<dyn LedgerClient>,
    authorized: AtomicBool,
    clock: fn() -> i64,
}

/// Clears the in-flight mark even if the delivery future is dropped early.
struct InFlight<'a> {
    engine: &'a ShiftEngine,
    id: ShiftId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.engine.lock().in_flight.remove(&self.id);
    }
}

impl ShiftEngine {
    /// Build the engine from whatever the store holds; an empty or unreadable
    /// store starts an empty roster with default settings.
    pub fn open(
        mut store: Box<dyn SnapshotStore>,
        ledger: Arc<dyn LedgerClient>,
        authorized: bool,
    ) -> Self {
        let snapshot = store.load().unwrap_or_default();
        let (roster, rejected) = Roster::from_entries(snapshot.users);

        for raw in &snapshot.unreadable {
            warning(format!("Dropped unreadable saved shift: {}", raw));
            store.audit("snapshot_entry_dropped", "", raw);
        }
        for bad in &rejected {
            warning(format!("Dropped malformed saved shift for '{}'.", bad.name));
            store.audit("snapshot_entry_dropped", &bad.id.to_string(), &bad.name);
        }

        Self {
            state: Mutex::new(EngineState {
                roster,
                dark: snapshot.dark,
                spreadsheet: snapshot.spreadsheet,
                current: None,
                in_flight: HashSet::new(),
                store,
                persist_failures: 0,
            }),
            ledger,
            authorized: AtomicBool::new(authorized),
            clock: now_millis,
        }
    }

    /// Replace the wall clock, in epoch milliseconds.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    // ------------------------------------------------
    // Authorization signal
    // ------------------------------------------------

    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::Relaxed);
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::Relaxed)
    }

    // ------------------------------------------------
    // Roster intents
    // ------------------------------------------------

    /// Start a shift. Blank names are rejected and change nothing.
    pub fn clock_in(&self, name: &str) -> AppResult<ShiftId> {
        let now = self.now();
        let mut st = self.lock();
        let id = st.roster.clock_in(name, now)?;
        st.current = Some(id);
        st.persist();
        st.audit("clock_in", id, name.trim());
        Ok(id)
    }

    /// Pick an entry already on the roster and make it the current one.
    pub fn select(&self, id: ShiftId) -> AppResult<ShiftEntry> {
        let mut st = self.lock();
        match st.roster.get(id).cloned() {
            Some(entry) => {
                st.current = Some(id);
                Ok(entry)
            }
            None => Err(st.stale_reference("select", id)),
        }
    }

    /// Remove an entry, active or pending, without touching the ledger.
    pub fn cancel(&self, id: ShiftId) -> AppResult<ShiftEntry> {
        let mut st = self.lock();
        let entry = match st.roster.cancel(id) {
            Ok(entry) => entry,
            Err(AppError::NotFound(_)) => return Err(st.stale_reference("cancel", id)),
            Err(e) => return Err(e),
        };
        st.forget(id);
        st.persist();
        st.audit("cancel", id, &entry.name);
        Ok(entry)
    }

    /// Stamp the clock-out, persist, then hand the shift to the ledger.
    ///
    /// The clock-out stays recorded whatever the ledger answers.
    pub async fn clock_out(&self, id: ShiftId) -> AppResult<SyncOutcome> {
        let now = self.now();
        {
            let mut st = self.lock();
            let entry = match st.roster.record_clock_out(id, now) {
                Ok(entry) => entry,
                Err(AppError::NotFound(_)) => return Err(st.stale_reference("clock_out", id)),
                Err(e) => return Err(e),
            };
            st.persist();
            let duration = LedgerRecord::from_entry(&entry)
                .map(|r| r.formatted_duration)
                .unwrap_or_default();
            st.audit("clock_out", id, &format!("{} after {}", entry.name, duration));
        }

        self.deliver(id).await
    }

    /// Re-attempt delivery of a pending entry, reusing its recorded clock-out.
    pub async fn retry(&self, id: ShiftId) -> AppResult<SyncOutcome> {
        {
            let mut st = self.lock();
            match st.roster.get(id).map(ShiftEntry::is_clocked_out) {
                None => return Err(st.stale_reference("retry", id)),
                Some(false) => return Err(AppError::InvalidState(id)),
                Some(true) => {}
            }
        }
        self.deliver(id).await
    }

    /// Retry every pending entry concurrently. Results come back in roster
    /// order; each one is applied to the roster as soon as it arrives.
    pub async fn retry_all(&self) -> Vec<(ShiftId, AppResult<SyncOutcome>)> {
        let ids = self.lock().roster.pending_ids();
        join_all(
            ids.into_iter()
                .map(|id| async move { (id, self.retry(id).await) }),
        )
        .await
    }

    async fn deliver(&self, id: ShiftId) -> AppResult<SyncOutcome> {
        let (sheet, record) = {
            let mut st = self.lock();
            let entry = match st.roster.get(id).cloned() {
                Some(e) => e,
                None => return Err(st.stale_reference("deliver", id)),
            };
            let record = LedgerRecord::from_entry(&entry).ok_or(AppError::InvalidState(id))?;

            if !self.is_authorized() {
                st.audit("sync_skipped", id, "not signed in");
                return Err(AppError::NotAuthorized);
            }
            if !st.spreadsheet.is_selected() {
                st.audit("sync_skipped", id, "no spreadsheet selected");
                return Err(AppError::SpreadsheetNotSelected);
            }
            if !st.in_flight.insert(id) {
                return Err(AppError::SyncInFlight(id));
            }
            (st.spreadsheet.clone(), record)
        };

        let _mark = InFlight { engine: self, id };
        let result = self.ledger.append_record(&sheet, &record).await;

        let mut st = self.lock();
        let outcome = st.apply_sync_result(id, &sheet, result);
        drop(st);
        outcome
    }

    // ------------------------------------------------
    // Settings
    // ------------------------------------------------

    pub fn toggle_dark(&self) -> bool {
        let dark = !self.lock().dark;
        self.set_dark(dark);
        dark
    }

    pub fn set_dark(&self, dark: bool) {
        let mut st = self.lock();
        st.dark = dark;
        st.persist();
        st.store
            .audit("theme", "", if dark { "dark mode on" } else { "dark mode off" });
    }

    /// Store the sheet returned by the picker. Requires a signed-in operator.
    pub fn select_spreadsheet(&self, sheet: SpreadsheetRef) -> AppResult<()> {
        if !self.is_authorized() {
            return Err(AppError::NotAuthorized);
        }
        if !sheet.is_selected() {
            return Err(AppError::SpreadsheetNotSelected);
        }
        let mut st = self.lock();
        st.store.audit(
            "spreadsheet_selected",
            sheet.sheet_id().unwrap_or(""),
            sheet.display_name(),
        );
        st.spreadsheet = sheet;
        st.persist();
        Ok(())
    }

    pub fn clear_spreadsheet(&self) {
        let mut st = self.lock();
        let current = st.spreadsheet.clone();
        st.clear_spreadsheet_if(&current, "cleared by operator");
    }

    /// Probe the configured sheet and forget it when it is gone.
    pub async fn verify_spreadsheet(&self) -> AppResult<SheetValidity> {
        let sheet = self.lock().spreadsheet.clone();
        if !sheet.is_selected() {
            return Err(AppError::SpreadsheetNotSelected);
        }
        if !self.is_authorized() {
            return Err(AppError::NotAuthorized);
        }

        let validity = self.ledger.validate_spreadsheet(&sheet).await?;
        if validity == SheetValidity::Invalid {
            self.lock()
                .clear_spreadsheet_if(&sheet, "spreadsheet failed validation");
        }
        Ok(validity)
    }

    // ------------------------------------------------
    // Queries
    // ------------------------------------------------

    pub fn entries(&self) -> Vec<ShiftEntry> {
        self.lock().roster.entries().to_vec()
    }

    pub fn entry(&self, id: ShiftId) -> Option<ShiftEntry> {
        self.lock().roster.get(id).cloned()
    }

    pub fn current(&self) -> Option<ShiftId> {
        self.lock().current
    }

    pub fn settings(&self) -> Settings {
        let st = self.lock();
        Settings {
            dark: st.dark,
            spreadsheet: st.spreadsheet.clone(),
        }
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        self.lock().snapshot()
    }

    /// Number of snapshot writes that failed since the engine was opened.
    pub fn persistence_failures(&self) -> u64 {
        self.lock().persist_failures
    }

    /// Ids whose append is currently awaiting the ledger.
    pub fn in_flight(&self) -> Vec<ShiftId> {
        let mut ids: Vec<_> = self.lock().in_flight.iter().copied().collect();
        ids.sort();
        ids
    }
}
