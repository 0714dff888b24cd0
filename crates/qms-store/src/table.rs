//! Record store trait
//!
//! A store exposes named tables of string cells. Row 1 of every table is its
//! header. Backends implement three primitives; header maintenance and
//! row-map reads are built on top of them.

use async_trait::async_trait;
use qms_records::{row_to_map, RowMap};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::error::StoreResult;

/// Identifier of a backing table (spreadsheet key)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    /// Create table identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote tabular store
///
/// Implementations perform no schema validation; callers are responsible for
/// row length and column order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every row of the table, header included, in storage order
    async fn get_all_values(&self, table: &TableId) -> StoreResult<Vec<Vec<String>>>;

    /// Insert `row` so that it becomes row `index` (1-based)
    async fn insert_row(&self, table: &TableId, row: &[String], index: usize) -> StoreResult<()>;

    /// Append `row` after the last row
    async fn append_row(&self, table: &TableId, row: &[String]) -> StoreResult<()>;

    /// Make `headers` row 1 of the table
    ///
    /// Inserts the header above existing content when the table is empty or
    /// its first row differs. Returns `true` if a row was inserted.
    async fn ensure_header(&self, table: &TableId, headers: &[String]) -> StoreResult<bool> {
        let values = self.get_all_values(table).await?;
        match values.first() {
            Some(first) if first.as_slice() == headers => Ok(false),
            _ => {
                tracing::info!(%table, "writing header row");
                self.insert_row(table, headers, 1).await?;
                Ok(true)
            }
        }
    }

    /// Data rows keyed by header name, in storage order
    async fn read_all_rows(&self, table: &TableId) -> StoreResult<Vec<RowMap>> {
        let values = self.get_all_values(table).await?;
        let Some((headers, rows)) = values.split_first() else {
            return Ok(Vec::new());
        };
        Ok(rows.iter().map(|row| row_to_map(headers, row)).collect())
    }
}
