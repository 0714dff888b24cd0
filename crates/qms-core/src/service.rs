//! Wiring of store, clock, forms and admin panel

use qms_records::RecordType;
use qms_store::{MemoryStore, RecordStore, SheetsStore};
use std::sync::Arc;
use tracing::info;

use crate::admin::{AdminPanel, AdminSecret};
use crate::clock::{Clock, SystemClock};
use crate::config::{Backend, QmsConfig, RecordTables};
use crate::error::{ConfigError, QmsResult};
use crate::forms::FormWorkflow;

/// QMS application service
#[derive(Clone)]
pub struct QmsService {
    store: Arc<dyn RecordStore>,
    tables: RecordTables,
    forms: FormWorkflow,
    admin: AdminPanel,
}

impl QmsService {
    /// Create service over an existing store
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        tables: RecordTables,
        clock: Arc<dyn Clock>,
        secret: AdminSecret,
    ) -> Self {
        let forms = FormWorkflow::new(Arc::clone(&store), tables.clone(), clock);
        let admin = AdminPanel::new(Arc::clone(&store), tables.clone(), secret);
        Self {
            store,
            tables,
            forms,
            admin,
        }
    }

    /// Build the configured backend with the system clock
    ///
    /// # Errors
    /// Returns `QmsError::Config` for incomplete settings and
    /// `QmsError::BackingStore` if the HTTP client cannot be built
    pub fn from_config(config: &QmsConfig) -> QmsResult<Self> {
        let tables = config.tables()?;
        let password = config
            .admin_password
            .as_deref()
            .ok_or(ConfigError::Missing("admin_password"))?;

        let store: Arc<dyn RecordStore> = match config.backend {
            Backend::Sheets => Arc::new(SheetsStore::new(config.sheets_config()?)?),
            Backend::Memory => Arc::new(MemoryStore::with_tables(tables.all())),
        };
        info!(backend = ?config.backend, "record store ready");

        Ok(Self::new(
            store,
            tables,
            Arc::new(SystemClock),
            AdminSecret::new(password),
        ))
    }

    /// Make the declared header row 1 of every table
    ///
    /// Returns the record types whose header had to be written.
    ///
    /// # Errors
    /// Returns `QmsError::BackingStore` on the first table that fails
    pub async fn ensure_headers(&self) -> QmsResult<Vec<RecordType>> {
        let mut written = Vec::new();
        for record_type in RecordType::ALL {
            let table = self.tables.get(record_type);
            if self
                .store
                .ensure_header(table, &record_type.header_row())
                .await?
            {
                written.push(record_type);
            }
        }
        Ok(written)
    }

    /// Form workflow
    #[inline]
    #[must_use]
    pub fn forms(&self) -> &FormWorkflow {
        &self.forms
    }

    /// Admin panel
    #[inline]
    #[must_use]
    pub fn admin(&self) -> &AdminPanel {
        &self.admin
    }

    /// Table configuration
    #[inline]
    #[must_use]
    pub fn tables(&self) -> &RecordTables {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_from_config() {
        let config = QmsConfig::from_toml_str(
            r#"
            backend = "memory"
            admin_password = "admin123"
            "#,
        )
        .unwrap();
        let service = QmsService::from_config(&config).unwrap();

        assert_eq!(service.ensure_headers().await.unwrap(), RecordType::ALL.to_vec());
        assert!(service.ensure_headers().await.unwrap().is_empty());

        let id = service.forms().render(RecordType::Deviation).await.unwrap();
        assert!(id.to_string().starts_with("D-"));
        assert!(service.admin().open("admin123").await.is_ok());
    }
}
