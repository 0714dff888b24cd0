//! Password-gated view of every stored record
//!
//! The password is a shared secret compared in constant time. The gate hides
//! the tables from casual visitors; it is not an authentication system.

use futures::future::try_join_all;
use qms_records::RecordType;
use qms_store::RecordStore;
use sha2::{Digest, Sha256};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::RecordTables;
use crate::error::{QmsError, QmsResult};

/// Configured admin password, held as its SHA-256 digest
#[derive(Clone)]
pub struct AdminSecret {
    digest: [u8; 32],
}

impl AdminSecret {
    /// Create secret from the configured password
    #[must_use]
    pub fn new(password: &str) -> Self {
        Self {
            digest: digest(password),
        }
    }

    /// Check a candidate password
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(&self.digest, &digest(candidate))
    }
}

impl Debug for AdminSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("AdminSecret(<redacted>)")
    }
}

fn digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Stored content of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub record_type: RecordType,
    /// Row 1 as stored, or the declared headers for an empty table
    pub headers: Vec<String>,
    /// Data rows in storage order
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    fn from_values(record_type: RecordType, mut values: Vec<Vec<String>>) -> Self {
        if values.is_empty() {
            return Self {
                record_type,
                headers: record_type.header_row(),
                rows: Vec::new(),
            };
        }
        let headers = values.remove(0);
        Self {
            record_type,
            headers,
            rows: values,
        }
    }

    /// Check whether the table holds no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Notice to show instead of an empty table
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        self.is_empty().then(|| self.record_type.empty_notice())
    }
}

/// Every table, in record type order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminView {
    pub tables: Vec<TableView>,
}

impl AdminView {
    /// View of one record type
    #[must_use]
    pub fn table(&self, record_type: RecordType) -> Option<&TableView> {
        self.tables.iter().find(|t| t.record_type == record_type)
    }
}

/// Admin panel
#[derive(Clone)]
pub struct AdminPanel {
    store: Arc<dyn RecordStore>,
    tables: RecordTables,
    secret: AdminSecret,
}

impl AdminPanel {
    /// Create panel
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, tables: RecordTables, secret: AdminSecret) -> Self {
        Self {
            store,
            tables,
            secret,
        }
    }

    /// Read every table if `password` matches
    ///
    /// A wrong password reads nothing.
    ///
    /// # Errors
    /// - `QmsError::AccessDenied` on a wrong password
    /// - `QmsError::BackingStore` if any table cannot be read
    pub async fn open(&self, password: &str) -> QmsResult<AdminView> {
        if !self.secret.verify(password) {
            warn!("admin access denied");
            return Err(QmsError::AccessDenied);
        }

        let reads = RecordType::ALL.into_iter().map(|record_type| {
            let table = self.tables.get(record_type);
            async move {
                let values = self.store.get_all_values(table).await?;
                Ok::<_, QmsError>(TableView::from_values(record_type, values))
            }
        });
        let tables = try_join_all(reads).await?;

        info!(
            records = tables.iter().map(|t| t.rows.len()).sum::<usize>(),
            "admin access granted"
        );
        Ok(AdminView { tables })
    }
}
