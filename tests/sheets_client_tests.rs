use rshiftclock::core::engine::{ShiftEngine, SyncOutcome};
use rshiftclock::errors::AppError;
use rshiftclock::ledger::sheets::SheetsClient;
use rshiftclock::ledger::{Credential, LedgerClient};
use rshiftclock::models::ledger_record::LedgerRecord;
use rshiftclock::models::spreadsheet::{SheetValidity, SpreadsheetRef};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{MemoryStore, set_now, test_clock};

const APPEND_PATH: &str = "/v4/spreadsheets/sheet-1/values/Sheet1!A1:append";

fn client(server: &MockServer, token: Option<&str>) -> SheetsClient {
    SheetsClient::new(
        &server.uri(),
        "Sheet1!A1",
        Duration::from_secs(5),
        token.and_then(Credential::new),
    )
    .expect("client")
}

fn record() -> LedgerRecord {
    LedgerRecord {
        name: "Ada".into(),
        clock_in_at: 0,
        clock_out_at: 3_723_000,
        formatted_duration: "01:02:03".into(),
    }
}

fn sheet() -> SpreadsheetRef {
    SpreadsheetRef::new("sheet-1", "Timesheet")
}

#[tokio::test]
async fn append_posts_one_raw_row_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .and(query_param("valueInputOption", "RAW"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_partial_json(serde_json::json!({ "majorDimension": "ROWS" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, Some("tok-123"))
        .append_record(&sheet(), &record())
        .await
        .expect("append");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    let row = body["values"][0].as_array().expect("row");
    assert_eq!(row.len(), 4);
    assert_eq!(row[0], "Ada");
    assert_eq!(row[3], "01:02:03");
}

#[tokio::test]
async fn missing_spreadsheet_maps_to_stale_reference() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server, Some("tok"))
        .append_record(&sheet(), &record())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StaleSpreadsheet(id) if id == "sheet-1"));
}

#[tokio::test]
async fn other_http_errors_are_plain_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;

    let err = client(&server, Some("tok"))
        .append_record(&sheet(), &record())
        .await
        .unwrap_err();
    assert!(!matches!(err, AppError::StaleSpreadsheet(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn nothing_is_sent_without_credential_or_sheet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let signed_out = client(&server, None);
    assert!(!signed_out.is_authorized());
    assert!(matches!(
        signed_out.append_record(&sheet(), &record()).await,
        Err(AppError::NotAuthorized)
    ));

    assert!(matches!(
        client(&server, Some("tok"))
            .append_record(&SpreadsheetRef::unset(), &record())
            .await,
        Err(AppError::SpreadsheetNotSelected)
    ));
}

#[tokio::test]
async fn validation_reflects_metadata_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1"))
        .and(query_param("fields", "spreadsheetId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "spreadsheetId": "sheet-1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let c = client(&server, Some("tok"));
    assert_eq!(
        c.validate_spreadsheet(&sheet()).await.expect("validate"),
        SheetValidity::Valid
    );
    assert_eq!(
        c.validate_spreadsheet(&SpreadsheetRef::new("gone", "Old"))
            .await
            .expect("validate"),
        SheetValidity::Invalid
    );
}

#[tokio::test]
async fn engine_records_a_shift_through_the_sheets_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let ledger = Arc::new(client(&server, Some("tok")));
    let engine = ShiftEngine::open(store.boxed(), ledger, true).with_clock(test_clock);
    engine.select_spreadsheet(sheet()).expect("select");

    set_now(0);
    let id = engine.clock_in("Ada").expect("clock in");
    set_now(7_200_000);

    let outcome = engine.clock_out(id).await.expect("clock out");
    assert!(matches!(outcome, SyncOutcome::Recorded(ref e) if e.id == id));
    assert!(store.saved().expect("snapshot").users.is_empty());
}
