//! SheetsStore against an in-process fake of the Sheets v4 values API.

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use qms_store::{RecordStore, SheetsConfig, SheetsStore, StoreError, TableId};
use serde_json::{json, Value};
use std::sync::Arc;
use warp::http::{Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::reply::Response;
use warp::{Filter, Reply};

const TOKEN: &str = "test-token";
const SHEET_KEY: &str = "sheet-key";

#[derive(Debug, Default)]
struct FakeSheet {
    rows: Vec<Vec<String>>,
    requests: Vec<String>,
}

type Shared = Arc<Mutex<FakeSheet>>;

fn reply(status: StatusCode, body: Value) -> Response {
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

fn first_row(body: &Value) -> Vec<String> {
    body["values"][0]
        .as_array()
        .map(|cells| {
            cells
                .iter()
                .map(|c| c.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn handle(state: &Shared, method: &Method, path: &str, auth: Option<&str>, body: &[u8]) -> Response {
    let expected = format!("Bearer {TOKEN}");
    if auth != Some(expected.as_str()) {
        return reply(StatusCode::UNAUTHORIZED, json!({"error": "invalid credentials"}));
    }
    if !path.starts_with(&format!("/v4/spreadsheets/{SHEET_KEY}")) {
        return reply(StatusCode::NOT_FOUND, json!({"error": "not found"}));
    }

    let mut sheet = state.lock();
    sheet.requests.push(format!("{method} {path}"));
    let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    if *method == Method::GET && path.contains("/values/") {
        return reply(StatusCode::OK, json!({ "majorDimension": "ROWS", "values": sheet.rows }));
    }
    if *method == Method::GET {
        return reply(
            StatusCode::OK,
            json!({ "sheets": [{ "properties": { "sheetId": 7, "title": "Sheet1" } }] }),
        );
    }
    if *method == Method::POST && path.ends_with(":batchUpdate") {
        let range = &body["requests"][0]["insertDimension"]["range"];
        assert_eq!(range["sheetId"], json!(7));
        let start = range["startIndex"].as_u64().unwrap_or_default() as usize;
        sheet.rows.insert(start, Vec::new());
        return reply(StatusCode::OK, json!({}));
    }
    if *method == Method::PUT {
        let index: usize = path.rsplit("!A").next().and_then(|n| n.parse().ok()).unwrap_or(1);
        sheet.rows[index - 1] = first_row(&body);
        return reply(StatusCode::OK, json!({}));
    }
    if *method == Method::POST && path.ends_with(":append") {
        let row = first_row(&body);
        sheet.rows.push(row);
        return reply(StatusCode::OK, json!({}));
    }
    reply(StatusCode::BAD_REQUEST, json!({"error": "unsupported"}))
}

fn spawn_fake() -> (String, Shared) {
    let state: Shared = Arc::default();
    let filter_state = Arc::clone(&state);
    let routes = warp::method()
        .and(warp::path::full())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::bytes())
        .map(move |method: Method, path: FullPath, auth: Option<String>, body: Bytes| {
            handle(&filter_state, &method, path.as_str(), auth.as_deref(), &body)
        });
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (format!("http://{addr}"), state)
}

fn store(base_url: &str, token: &str) -> SheetsStore {
    SheetsStore::new(SheetsConfig::new(token).with_base_url(base_url)).unwrap()
}

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[tokio::test]
async fn header_append_and_read_round_trip() {
    let (base, state) = spawn_fake();
    let store = store(&base, TOKEN);
    let table = TableId::new(SHEET_KEY);
    let headers = cells(&["Date Submitted", "ID", "Details"]);

    assert!(store.ensure_header(&table, &headers).await.unwrap());
    assert!(!store.ensure_header(&table, &headers).await.unwrap());

    let row = cells(&["2026-03-14 09:05:00", "D-0326-001", "line stopped"]);
    store.append_row(&table, &row).await.unwrap();

    let rows = store.read_all_rows(&table).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["ID"], "D-0326-001");
    assert_eq!(rows[0]["Details"], "line stopped");

    let sheet = state.lock();
    assert_eq!(sheet.rows, vec![headers, row]);
    assert!(sheet
        .requests
        .iter()
        .any(|r| r == "POST /v4/spreadsheets/sheet-key/values/'Sheet1'!A1:append"));
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let (base, _state) = spawn_fake();
    let store = store(&base, "stale-token");

    let err = store
        .get_all_values(&TableId::new(SHEET_KEY))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unauthorized { .. }));
}

#[tokio::test]
async fn unknown_spreadsheet_is_table_not_found() {
    let (base, _state) = spawn_fake();
    let store = store(&base, TOKEN);

    let err = store
        .append_row(&TableId::new("other-key"), &cells(&["x"]))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(_)));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let store = store("http://127.0.0.1:1", TOKEN);
    let err = store
        .get_all_values(&TableId::new(SHEET_KEY))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Transport { .. }));
}
