//! Google Sheets backend
//!
//! Talks to the Sheets v4 REST API. Each [`TableId`] is a spreadsheet key and
//! rows live in one worksheet of that spreadsheet. Authentication is a bearer
//! token issued out of band; this module never mints tokens.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::instrument;

use crate::error::{StoreError, StoreResult};
use crate::table::{RecordStore, TableId};

/// Public Sheets API endpoint
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Worksheet used when none is configured
pub const DEFAULT_WORKSHEET: &str = "Sheet1";

const MAX_ERROR_BODY: usize = 512;

/// Connection settings for [`SheetsStore`]
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// API root, without trailing `/v4`
    pub base_url: String,
    /// OAuth bearer token with spreadsheet read/write scope
    pub token: String,
    /// Worksheet title holding the rows
    pub worksheet: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl SheetsConfig {
    /// Settings for the public endpoint
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            worksheet: DEFAULT_WORKSHEET.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// With API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With worksheet title
    #[must_use]
    pub fn with_worksheet(mut self, worksheet: impl Into<String>) -> Self {
        self.worksheet = worksheet.into();
        self
    }

    /// With request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

/// Sheets v4 record store
#[derive(Debug, Clone)]
pub struct SheetsStore {
    client: reqwest::Client,
    base: Url,
    worksheet: String,
    headers: HeaderMap,
}

impl SheetsStore {
    /// Create store
    ///
    /// # Errors
    /// Returns `StoreError::Setup` if the base URL or token is unusable
    pub fn new(config: SheetsConfig) -> StoreResult<Self> {
        let base = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| StoreError::Setup(format!("invalid sheets base url: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Setup(format!(
                "sheets base url cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| StoreError::Setup(format!("invalid auth header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Setup(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base,
            worksheet: config.worksheet,
            headers,
        })
    }

    /// Worksheet title
    #[inline]
    #[must_use]
    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    /// `'Title'` with embedded quotes doubled
    fn quoted_worksheet(&self) -> String {
        format!("'{}'", self.worksheet.replace('\'', "''"))
    }

    fn url(&self, table: &TableId, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Setup("sheets base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets"])
            .extend(segments.iter().copied());
        tracing::trace!(%table, %url, "sheets url");
        Ok(url)
    }

    async fn send(
        &self,
        table: &TableId,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> StoreResult<reqwest::Response> {
        let mut request = self
            .client
            .request(method, url)
            .headers(self.headers.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::transport(table, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = clip(response.text().await.unwrap_or_default());
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized {
                table: table.clone(),
                message: body,
            },
            StatusCode::NOT_FOUND => StoreError::TableNotFound(table.clone()),
            _ => StoreError::Status {
                table: table.clone(),
                status: status.as_u16(),
                body,
            },
        })
    }

    /// Numeric id of the configured worksheet
    async fn sheet_id(&self, table: &TableId) -> StoreResult<i64> {
        let mut url = self.url(table, &[table.as_str()])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");

        let meta: SpreadsheetMeta = self
            .send(table, Method::GET, url, None)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::decode(table, e.to_string()))?;

        meta.sheets
            .into_iter()
            .find(|s| s.properties.title == self.worksheet)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| StoreError::WorksheetNotFound {
                table: table.clone(),
                worksheet: self.worksheet.clone(),
            })
    }
}

fn clip(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

/// Render a cell the way the sheet displays it
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RecordStore for SheetsStore {
    #[instrument(name = "sheets_get_all_values", skip(self, table), fields(table = %table))]
    async fn get_all_values(&self, table: &TableId) -> StoreResult<Vec<Vec<String>>> {
        let range = self.quoted_worksheet();
        let url = self.url(table, &[table.as_str(), "values", &range])?;

        let values: ValueRange = self
            .send(table, Method::GET, url, None)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::decode(table, e.to_string()))?;

        let rows: Vec<Vec<String>> = values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        tracing::debug!(rows = rows.len(), "fetched values");
        Ok(rows)
    }

    #[instrument(name = "sheets_insert_row", skip(self, table, row), fields(table = %table))]
    async fn insert_row(&self, table: &TableId, row: &[String], index: usize) -> StoreResult<()> {
        if index == 0 {
            return Err(StoreError::RowOutOfRange {
                table: table.clone(),
                index,
                rows: 0,
            });
        }
        let sheet_id = self.sheet_id(table).await?;

        let batch = format!("{}:batchUpdate", table.as_str());
        let url = self.url(table, &[&batch])?;
        let body = json!({
            "requests": [{
                "insertDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": index - 1,
                        "endIndex": index,
                    },
                    "inheritFromBefore": false,
                }
            }]
        });
        self.send(table, Method::POST, url, Some(body)).await?;

        let range = format!("{}!A{index}", self.quoted_worksheet());
        let mut url = self.url(table, &[table.as_str(), "values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [row],
        });
        self.send(table, Method::PUT, url, Some(body)).await?;

        tracing::debug!(index, "inserted row");
        Ok(())
    }

    #[instrument(name = "sheets_append_row", skip(self, table, row), fields(table = %table))]
    async fn append_row(&self, table: &TableId, row: &[String]) -> StoreResult<()> {
        let range = format!("{}!A1", self.quoted_worksheet());
        let append = format!("{range}:append");
        let mut url = self.url(table, &[table.as_str(), "values", &append])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let body = json!({
            "majorDimension": "ROWS",
            "values": [row],
        });
        self.send(table, Method::POST, url, Some(body)).await?;

        tracing::debug!(cells = row.len(), "appended row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worksheet_quotes_are_doubled() {
        let store =
            SheetsStore::new(SheetsConfig::new("t").with_worksheet("Bob's sheet")).unwrap();
        assert_eq!(store.quoted_worksheet(), "'Bob''s sheet'");
    }

    #[test]
    fn url_layout() {
        let store = SheetsStore::new(
            SheetsConfig::new("t").with_base_url("http://localhost:9999/"),
        )
        .unwrap();
        let table = TableId::new("abc");
        let url = store.url(&table, &["abc", "values", "'Sheet1'"]).unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc/values/'Sheet1'");
    }

    #[test]
    fn rejects_non_base_url() {
        let err = SheetsStore::new(SheetsConfig::new("t").with_base_url("mailto:ops@example.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Setup(_)));
    }

    #[test]
    fn error_bodies_are_clipped_on_char_boundary() {
        let body = "é".repeat(MAX_ERROR_BODY);
        let clipped = clip(body);
        assert!(clipped.len() <= MAX_ERROR_BODY);
        assert!(clipped.chars().all(|c| c == 'é'));
    }

    #[test]
    fn numbers_render_as_text() {
        assert_eq!(cell_text(json!(42)), "42");
        assert_eq!(cell_text(json!("C-0326-001")), "C-0326-001");
        assert_eq!(cell_text(Value::Null), "");
    }
}
