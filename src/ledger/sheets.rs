//! Google Sheets v4 ledger client.
//!
//! Append goes to `POST /v4/spreadsheets/{id}/values/{range}:append` with
//! `valueInputOption=RAW`; validation is a cheap metadata `GET` that only
//! asks for the spreadsheet id.

use super::{Credential, LedgerClient};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::ledger_record::LedgerRecord;
use crate::models::spreadsheet::{SheetValidity, SpreadsheetRef};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TARGET_RANGE: &str = "Sheet1!A1";

/// Value range body for the append call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppendBody {
    major_dimension: &'static str,
    values: Vec<[String; 4]>,
}

#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    api_base: String,
    target_range: String,
    credential: Option<Credential>,
}

impl SheetsClient {
    pub fn new(
        api_base: &str,
        target_range: &str,
        timeout: Duration,
        credential: Option<Credential>,
    ) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            target_range: target_range.to_string(),
            credential,
        })
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Self::new(
            &cfg.sheets_api_base,
            &cfg.target_range,
            Duration::from_secs(cfg.request_timeout_secs),
            cfg.credential(),
        )
    }

    pub fn is_authorized(&self) -> bool {
        self.credential.is_some()
    }

    fn sheet_id<'a>(&self, sheet: &'a SpreadsheetRef) -> AppResult<&'a str> {
        sheet.sheet_id().ok_or(AppError::SpreadsheetNotSelected)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> AppResult<reqwest::RequestBuilder> {
        let cred = self.credential.as_ref().ok_or(AppError::NotAuthorized)?;
        Ok(req.bearer_auth(cred.bearer()))
    }
}

#[async_trait]
impl LedgerClient for SheetsClient {
    async fn append_record(&self, sheet: &SpreadsheetRef, record: &LedgerRecord) -> AppResult<()> {
        let id = self.sheet_id(sheet)?;
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}:append",
            self.api_base, id, self.target_range
        );
        let body = AppendBody {
            major_dimension: "ROWS",
            values: vec![record.to_row()],
        };

        let req = self
            .http
            .post(&url)
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        let resp = self.authorize(req)?.send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::StaleSpreadsheet(id.to_string()));
        }

        let body = resp.text().await.unwrap_or_default();
        Err(AppError::Other(format!(
            "append rejected: HTTP {} {}",
            status.as_u16(),
            body.chars().take(200).collect::<String>()
        )))
    }

    async fn validate_spreadsheet(&self, sheet: &SpreadsheetRef) -> AppResult<SheetValidity> {
        let id = self.sheet_id(sheet)?;
        let url = format!("{}/v4/spreadsheets/{}", self.api_base, id);

        let req = self.http.get(&url).query(&[("fields", "spreadsheetId")]);
        let outcome = self.authorize(req)?.send().await;

        // Any failure to reach the sheet counts as invalid.
        match outcome {
            Ok(resp) if resp.status() == StatusCode::OK => Ok(SheetValidity::Valid),
            _ => Ok(SheetValidity::Invalid),
        }
    }
}
