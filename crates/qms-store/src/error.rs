//! Error types for the record store
//!
//! Every variant is fatal for the operation that raised it. Nothing here is
//! retried by the store.

use crate::table::TableId;

/// Errors reaching or writing a backing table
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Credential rejected by the backing store
    #[error("access to {table} rejected: {message}")]
    Unauthorized { table: TableId, message: String },

    /// Table does not exist
    #[error("table not found: {0}")]
    TableNotFound(TableId),

    /// Worksheet title not present in the spreadsheet
    #[error("worksheet '{worksheet}' not found in {table}")]
    WorksheetNotFound { table: TableId, worksheet: String },

    /// Network or protocol failure
    #[error("transport error for {table}: {message}")]
    Transport { table: TableId, message: String },

    /// Unexpected HTTP status
    #[error("backing store returned {status} for {table}: {body}")]
    Status {
        table: TableId,
        status: u16,
        body: String,
    },

    /// Response body could not be decoded
    #[error("could not decode response for {table}: {message}")]
    Decode { table: TableId, message: String },

    /// Row index outside the table
    #[error("row index {index} out of range for {table} ({rows} rows)")]
    RowOutOfRange {
        table: TableId,
        index: usize,
        rows: usize,
    },

    /// Client could not be configured
    #[error("store setup failed: {0}")]
    Setup(String),
}

impl StoreError {
    /// Create transport error for table
    pub fn transport(table: &TableId, message: impl Into<String>) -> Self {
        Self::Transport {
            table: table.clone(),
            message: message.into(),
        }
    }

    /// Create decode error for table
    pub fn decode(table: &TableId, message: impl Into<String>) -> Self {
        Self::Decode {
            table: table.clone(),
            message: message.into(),
        }
    }

    /// Table the failure relates to, if any
    #[must_use]
    pub fn table(&self) -> Option<&TableId> {
        match self {
            Self::Unauthorized { table, .. }
            | Self::WorksheetNotFound { table, .. }
            | Self::Transport { table, .. }
            | Self::Status { table, .. }
            | Self::Decode { table, .. }
            | Self::RowOutOfRange { table, .. }
            | Self::TableNotFound(table) => Some(table),
            Self::Setup(_) => None,
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
