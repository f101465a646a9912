//! External ledger seam.
//!
//! The engine only knows this trait. `SheetsClient` talks to the Google
//! Sheets REST API; tests plug in scripted implementations.

pub mod sheets;

use crate::errors::AppResult;
use crate::models::ledger_record::LedgerRecord;
use crate::models::spreadsheet::{SheetValidity, SpreadsheetRef};
use async_trait::async_trait;

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Append one completed shift as a row. No retries happen here.
    ///
    /// `Err(StaleSpreadsheet)` means the reference itself is unusable; any
    /// other error is a plain delivery failure.
    async fn append_record(&self, sheet: &SpreadsheetRef, record: &LedgerRecord) -> AppResult<()>;

    /// Check that the configured spreadsheet still exists and is reachable.
    async fn validate_spreadsheet(&self, sheet: &SpreadsheetRef) -> AppResult<SheetValidity>;
}

/// Opaque credential handed over by the sign-in collaborator.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token.trim().to_string()))
        }
    }

    pub(crate) fn bearer(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}
