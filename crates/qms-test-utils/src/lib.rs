//! Testing utilities for QMS workspace
//!
//! Shared fixtures: a stopped clock, a memory store with headers in place and
//! a service wired over both.

#![allow(missing_docs)]

use chrono::{NaiveDate, NaiveDateTime};
use qms_core::{
    AdminSecret, ChangeControlDraft, ComplaintDraft, DeviationDraft, Draft, FixedClock,
    QmsService, RecordTables,
};
use qms_records::{RecordId, RecordType};
use qms_store::MemoryStore;
use std::sync::Arc;

pub const ADMIN_PASSWORD: &str = "admin123";

/// 2026-03-14 09:05:00, identifiers fall in period 0326
pub fn test_now() -> NaiveDateTime {
    at(2026, 3, 14, 9, 5, 0)
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .unwrap()
}

/// Memory store holding the three tables, each with its header row
pub fn headed_store() -> Arc<MemoryStore> {
    let tables = RecordTables::named();
    let store = MemoryStore::with_tables(tables.all());
    for record_type in RecordType::ALL {
        store.seed(tables.get(record_type).clone(), vec![record_type.header_row()]);
    }
    Arc::new(store)
}

pub struct TestQms {
    pub service: QmsService,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub tables: RecordTables,
}

impl TestQms {
    /// Service over an existing store
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        let tables = RecordTables::named();
        let clock = Arc::new(FixedClock::new(test_now()));
        let service = QmsService::new(
            store.clone(),
            tables.clone(),
            clock.clone(),
            AdminSecret::new(ADMIN_PASSWORD),
        );
        Self {
            service,
            store,
            clock,
            tables,
        }
    }

    pub fn rows(&self, record_type: RecordType) -> Vec<Vec<String>> {
        self.store
            .rows(self.tables.get(record_type))
            .unwrap_or_default()
    }
}

pub fn setup_test_qms() -> TestQms {
    TestQms::with_store(headed_store())
}

pub fn complaint_draft(id: &RecordId) -> Draft {
    Draft::Complaint(ComplaintDraft {
        id: id.to_string(),
        product_name: "Tablet X".into(),
        severity: "Medium".into(),
        contact_number: "555-0100".into(),
        details: "cracked casing".into(),
        submitted_by: String::new(),
    })
}

pub fn deviation_draft(id: &RecordId) -> Draft {
    Draft::Deviation(DeviationDraft {
        id: id.to_string(),
        department: "QC".into(),
        deviation_type: "Major".into(),
        details: "temperature excursion".into(),
        reported_by: "Ann".into(),
    })
}

pub fn change_control_draft(id: &RecordId) -> Draft {
    Draft::ChangeControl(ChangeControlDraft {
        id: id.to_string(),
        change_type: "Process".into(),
        justification: "new supplier".into(),
        impact_analysis: "revalidate line 2".into(),
        requested_by: "Bob".into(),
    })
}

/// Complete draft of `record_type` carrying `id`
pub fn draft_for(record_type: RecordType, id: &RecordId) -> Draft {
    match record_type {
        RecordType::Complaint => complaint_draft(id),
        RecordType::Deviation => deviation_draft(id),
        RecordType::ChangeControl => change_control_draft(id),
    }
}
