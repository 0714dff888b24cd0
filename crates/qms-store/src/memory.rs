//! In-process record store
//!
//! Keeps tables in memory and counts calls per primitive. Backs local demo
//! runs and the test suites.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{StoreError, StoreResult};
use crate::table::{RecordStore, TableId};

/// Snapshot of primitive call counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    /// `get_all_values` calls
    pub reads: usize,
    /// `insert_row` calls
    pub inserts: usize,
    /// `append_row` calls
    pub appends: usize,
}

/// Memory-backed store
///
/// Only tables registered via [`MemoryStore::with_tables`] or
/// [`MemoryStore::create_table`] exist; every other id is `TableNotFound`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<TableId, Vec<Vec<String>>>>,
    reads: AtomicUsize,
    inserts: AtomicUsize,
    appends: AtomicUsize,
}

impl MemoryStore {
    /// Create store with no tables
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store with empty tables
    #[must_use]
    pub fn with_tables<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = TableId>,
    {
        let store = Self::new();
        for id in ids {
            store.create_table(id);
        }
        store
    }

    /// Register an empty table (no-op if it exists)
    pub fn create_table(&self, id: TableId) {
        self.tables.lock().entry(id).or_default();
    }

    /// Replace a table's content
    pub fn seed(&self, id: TableId, rows: Vec<Vec<String>>) {
        self.tables.lock().insert(id, rows);
    }

    /// Current content of a table
    #[must_use]
    pub fn rows(&self, id: &TableId) -> Option<Vec<Vec<String>>> {
        self.tables.lock().get(id).cloned()
    }

    /// Call counts so far
    #[must_use]
    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            reads: self.reads.load(Ordering::SeqCst),
            inserts: self.inserts.load(Ordering::SeqCst),
            appends: self.appends.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_all_values(&self, table: &TableId) -> StoreResult<Vec<Vec<String>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.tables
            .lock()
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(table.clone()))
    }

    async fn insert_row(&self, table: &TableId, row: &[String], index: usize) -> StoreResult<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.clone()))?;
        if index == 0 || index > rows.len() + 1 {
            return Err(StoreError::RowOutOfRange {
                table: table.clone(),
                index,
                rows: rows.len(),
            });
        }
        rows.insert(index - 1, row.to_vec());
        Ok(())
    }

    async fn append_row(&self, table: &TableId, row: &[String]) -> StoreResult<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.tables
            .lock()
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.clone()))?
            .push(row.to_vec());
        Ok(())
    }
}
