//! Monotonic per-month identifier generation
//!
//! The next identifier is derived from the rows already stored: the highest
//! serial issued for the record type in the current month, plus one. Nothing
//! is reserved; two concurrent renders see the same identifier.
//!
//! A submitted identifier is accepted only if it is not yet stored, belongs
//! to the current or the previous month, and is not ahead of the next serial
//! for its month.

use chrono::NaiveDateTime;
use qms_records::{Period, RecordError, RecordId, RecordType, RowMap, COL_ID};
use qms_store::RecordStore;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::RecordTables;
use crate::error::{QmsError, QmsResult};

/// Identifier generator over a record store
#[derive(Clone)]
pub struct IdGenerator {
    store: Arc<dyn RecordStore>,
    tables: RecordTables,
}

impl IdGenerator {
    /// Create generator
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, tables: RecordTables) -> Self {
        Self { store, tables }
    }

    /// Next identifier for `record_type` in the period containing `now`
    ///
    /// # Errors
    /// Returns `QmsError::BackingStore` if the table cannot be read
    pub async fn next_id(&self, record_type: RecordType, now: NaiveDateTime) -> QmsResult<RecordId> {
        let table = self.tables.get(record_type);
        let rows = self.store.read_all_rows(table).await?;
        let id = next_in_period(record_type, Period::of(&now), &rows)?;
        debug!(%table, %id, "generated identifier");
        Ok(id)
    }

    /// Check that a submitted `id` could have been rendered and is still free
    ///
    /// # Errors
    /// - `QmsError::UnissuedId` if `id` is outside the current or previous
    ///   month of `now`, or ahead of the next serial for its month
    /// - `QmsError::DuplicateId` if `id` is already stored
    /// - `QmsError::BackingStore` if the table cannot be read
    pub async fn check_issued(&self, id: &RecordId, now: NaiveDateTime) -> QmsResult<()> {
        let current = Period::of(&now);
        if id.period() != current && id.period() != current.previous() {
            warn!(%id, %current, "identifier outside open periods");
            return Err(QmsError::UnissuedId(*id));
        }

        let rows = self.store.read_all_rows(self.tables.get(id.record_type())).await?;
        if is_stored(id, &rows) {
            warn!(%id, "identifier taken since render");
            return Err(QmsError::DuplicateId(*id));
        }

        let expected = next_in_period(id.record_type(), id.period(), &rows)?;
        if id.serial() > expected.serial() {
            warn!(%id, %expected, "identifier ahead of table");
            return Err(QmsError::UnissuedId(*id));
        }
        Ok(())
    }
}

fn is_stored(id: &RecordId, rows: &[RowMap]) -> bool {
    let wanted = id.to_string();
    rows.iter()
        .any(|row| row.get(COL_ID).is_some_and(|cell| cell.trim() == wanted))
}

/// Next identifier given the stored rows of one table
///
/// Identifiers of other periods or types are ignored, so the serial restarts
/// at 1 each month. Cells that do not parse are skipped.
///
/// # Errors
/// Returns `RecordError::SerialExhausted` if the stored maximum is `u32::MAX`
pub fn next_in_period(
    record_type: RecordType,
    period: Period,
    rows: &[RowMap],
) -> Result<RecordId, RecordError> {
    let latest = rows
        .iter()
        .filter_map(|row| row.get(COL_ID))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .filter_map(|cell| match cell.parse::<RecordId>() {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(table = record_type.table_name(), cell, %err, "skipping unparseable identifier");
                None
            }
        })
        .filter(|id| id.is_in(record_type, period))
        .max_by_key(RecordId::serial);

    match latest {
        Some(id) => id.next(),
        None => Ok(RecordId::first(record_type, period)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use qms_store::MemoryStore;

    fn rows(ids: &[&str]) -> Vec<RowMap> {
        ids.iter()
            .map(|id| RowMap::from_iter([(COL_ID.to_string(), (*id).to_string())]))
            .collect()
    }

    fn march() -> Period {
        Period::new(3, 26).unwrap()
    }

    #[test]
    fn empty_table_starts_at_one() {
        let id = next_in_period(RecordType::Deviation, march(), &[]).unwrap();
        assert_eq!(id.to_string(), "D-0326-001");
    }

    #[test]
    fn takes_max_not_count() {
        let existing = rows(&["C-0326-001", "C-0326-007", "C-0326-003"]);
        let id = next_in_period(RecordType::Complaint, march(), &existing).unwrap();
        assert_eq!(id.to_string(), "C-0326-008");
    }

    #[test]
    fn other_periods_and_types_ignored() {
        let existing = rows(&["C-0226-044", "CC-0326-009", "C-0325-010"]);
        let id = next_in_period(RecordType::Complaint, march(), &existing).unwrap();
        assert_eq!(id.to_string(), "C-0326-001");
    }

    #[test]
    fn garbage_cells_skipped() {
        let existing = rows(&["", "legacy-42", "D-0326-002", "D-13-001"]);
        let id = next_in_period(RecordType::Deviation, march(), &existing).unwrap();
        assert_eq!(id.to_string(), "D-0326-003");
    }

    #[test]
    fn serial_widens_past_999() {
        let existing = rows(&["D-0326-999"]);
        let id = next_in_period(RecordType::Deviation, march(), &existing).unwrap();
        assert_eq!(id.to_string(), "D-0326-1000");
    }

    #[test]
    fn largest_stored_serial_has_no_successor() {
        let existing = rows(&["C-0326-4294967295"]);
        let err = next_in_period(RecordType::Complaint, march(), &existing).unwrap_err();
        assert_eq!(err, RecordError::SerialExhausted("C-0326-4294967295".into()));
    }

    fn march_20() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 20)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn generator_with(ids: &[&str]) -> (IdGenerator, Arc<MemoryStore>) {
        let tables = RecordTables::named();
        let store = Arc::new(MemoryStore::with_tables(tables.all()));
        let mut seeded = vec![RecordType::Deviation.header_row()];
        for id in ids {
            seeded.push(vec!["2026-03-01 10:00:00".into(), (*id).to_string()]);
        }
        store.seed(tables.deviation.clone(), seeded);
        (IdGenerator::new(store.clone(), tables), store)
    }

    #[tokio::test]
    async fn serial_ahead_of_table_is_unissued() {
        let (generator, _) = generator_with(&["D-0326-001"]);
        let now = march_20();

        generator.check_issued(&"D-0326-002".parse().unwrap(), now).await.unwrap();
        for forged in ["D-0326-500", "D-0326-4294967295"] {
            let err = generator
                .check_issued(&forged.parse().unwrap(), now)
                .await
                .unwrap_err();
            assert!(matches!(err, QmsError::UnissuedId(id) if id.to_string() == forged));
        }
    }

    #[tokio::test]
    async fn closed_periods_rejected_without_read() {
        let (generator, store) = generator_with(&[]);
        let now = march_20();

        generator.check_issued(&"D-0226-001".parse().unwrap(), now).await.unwrap();
        for stale in ["D-0126-001", "D-0426-001", "D-0325-001"] {
            let err = generator
                .check_issued(&stale.parse().unwrap(), now)
                .await
                .unwrap_err();
            assert!(matches!(err, QmsError::UnissuedId(_)), "{stale}");
        }
        assert_eq!(store.calls().reads, 1);
    }

    #[tokio::test]
    async fn generator_reads_configured_table() {
        let tables = RecordTables::named();
        let store = Arc::new(MemoryStore::with_tables(tables.all()));
        store.seed(
            tables.change_control.clone(),
            vec![
                RecordType::ChangeControl.header_row(),
                vec!["2026-03-01 10:00:00".into(), "CC-0326-004".into()],
            ],
        );
        let generator = IdGenerator::new(store.clone(), tables);
        let now = march_20();

        let id = generator.next_id(RecordType::ChangeControl, now).await.unwrap();
        assert_eq!(id.to_string(), "CC-0326-005");
        generator.check_issued(&id, now).await.unwrap();
        let err = generator
            .check_issued(&"CC-0326-004".parse().unwrap(), now)
            .await
            .unwrap_err();
        assert!(matches!(err, QmsError::DuplicateId(_)));
        assert_eq!(store.calls().reads, 3);
    }
}
