//! Unified application error type.
//! Roster, store, ledger and CLI layers all return AppError so callers can
//! tell a local contract violation from a ledger delivery failure.

use crate::models::shift_entry::ShiftId;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / infrastructure
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ---------------------------
    // Roster contract
    // ---------------------------
    #[error("A name is required to clock in")]
    Validation,

    #[error("No shift with id {0} is on the roster")]
    NotFound(ShiftId),

    #[error("Shift {0} is not in a state that allows this operation")]
    InvalidState(ShiftId),

    #[error("Shift {0} is already clocked out")]
    AlreadyClockedOut(ShiftId),

    // ---------------------------
    // Persistence
    // ---------------------------
    #[error("Failed to persist roster snapshot: {0}")]
    PersistenceWrite(String),

    // ---------------------------
    // Ledger
    // ---------------------------
    #[error("Could not record shift {id} in the spreadsheet: {reason}")]
    SyncFailed { id: ShiftId, reason: String },

    #[error("Shift {0} is already being recorded")]
    SyncInFlight(ShiftId),

    #[error("Spreadsheet '{0}' is no longer reachable")]
    StaleSpreadsheet(String),

    #[error("Spreadsheet not selected")]
    SpreadsheetNotSelected,

    #[error("Not signed in")]
    NotAuthorized,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for errors the operator resolves by retrying or cancelling the shift.
    pub fn leaves_shift_pending(&self) -> bool {
        matches!(
            self,
            AppError::SyncFailed { .. } | AppError::SpreadsheetNotSelected | AppError::NotAuthorized
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
