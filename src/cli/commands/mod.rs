pub mod auth;
pub mod cancel;
pub mod clock_in;
pub mod clock_out;
pub mod config;
pub mod dark;
pub mod init;
pub mod list;
pub mod log;
pub mod retry;
pub mod select;
pub mod sheet;

use crate::config::Config;
use crate::core::engine::{ShiftEngine, SyncOutcome};
use crate::db::store::SqliteStore;
use crate::errors::{AppError, AppResult};
use crate::ledger::sheets::SheetsClient;
use crate::models::shift_entry::ShiftId;
use crate::ui::messages::{error, info, set_dark_mode, success, warning};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Build the engine from the configured database and the Sheets client.
pub(crate) fn open_engine(cfg: &Config) -> AppResult<ShiftEngine> {
    let store = SqliteStore::open_path(&cfg.database)?;
    let ledger = Arc::new(SheetsClient::from_config(cfg)?);
    let engine = ShiftEngine::open(Box::new(store), ledger, cfg.is_authorized());
    set_dark_mode(engine.settings().dark);
    Ok(engine)
}

/// Single-threaded runtime: appends are the only suspending operations.
pub(crate) fn runtime() -> AppResult<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// Turn a delivery result into operator notifications.
///
/// Failures that leave the shift pending are shown but not propagated;
/// anything else is a real error for the caller.
pub(crate) fn report_sync(id: ShiftId, result: AppResult<SyncOutcome>) -> AppResult<()> {
    match result {
        Ok(SyncOutcome::Recorded(entry)) => {
            let duration = entry
                .duration_ms()
                .map(crate::utils::time::format_duration)
                .unwrap_or_default();
            success(format!(
                "Clocked out {} (#{}) after {}. Shift recorded.",
                entry.name, entry.id, duration
            ));
            Ok(())
        }
        Ok(SyncOutcome::Detached(id)) => {
            warning(format!("Shift #{} left the roster before it was recorded.", id));
            Ok(())
        }
        Err(e) if e.leaves_shift_pending() => {
            error(format!("Clock out not recorded: {}", e));
            if matches!(e, AppError::SpreadsheetNotSelected) {
                info("Select a spreadsheet with `rshiftclock sheet --select <ID>`.");
            }
            info(format!(
                "Shift #{} stays pending: run `rshiftclock retry {}` or `rshiftclock cancel {}`.",
                id, id, id
            ));
            Ok(())
        }
        Err(e) => Err(e),
    }
}
