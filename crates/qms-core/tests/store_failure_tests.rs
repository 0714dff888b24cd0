//! Backing store failures surface unchanged and stop the operation

use async_trait::async_trait;
use mockall::mock;
use qms_core::prelude::*;
use qms_core::{AdminSecret, FixedClock, RecordTables};
use qms_store::{RecordStore, StoreError, StoreResult, TableId};
use qms_test_utils::{draft_for, test_now, ADMIN_PASSWORD};
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl RecordStore for Store {
        async fn get_all_values(&self, table: &TableId) -> StoreResult<Vec<Vec<String>>>;
        async fn insert_row(&self, table: &TableId, row: &[String], index: usize) -> StoreResult<()>;
        async fn append_row(&self, table: &TableId, row: &[String]) -> StoreResult<()>;
    }
}

fn service(store: MockStore) -> QmsService {
    QmsService::new(
        Arc::new(store),
        RecordTables::named(),
        Arc::new(FixedClock::new(test_now())),
        AdminSecret::new(ADMIN_PASSWORD),
    )
}

fn unauthorized(table: &TableId) -> StoreError {
    StoreError::Unauthorized {
        table: table.clone(),
        message: "token expired".into(),
    }
}

#[tokio::test]
async fn render_surfaces_read_failure() {
    let mut store = MockStore::new();
    store
        .expect_get_all_values()
        .times(1)
        .returning(|table| Err(unauthorized(table)));

    let err = service(store)
        .forms()
        .render(RecordType::Complaint)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QmsError::BackingStore(StoreError::Unauthorized { .. })
    ));
}

#[tokio::test]
async fn failed_append_reports_backing_store() {
    let mut store = MockStore::new();
    store
        .expect_get_all_values()
        .returning(|_| Ok(vec![RecordType::Deviation.header_row()]));
    store
        .expect_append_row()
        .times(1)
        .returning(|table, _| {
            Err(StoreError::Transport {
                table: table.clone(),
                message: "connection reset".into(),
            })
        });

    let service = service(store);
    let id = service.forms().render(RecordType::Deviation).await.unwrap();
    let err = service
        .forms()
        .submit(&draft_for(RecordType::Deviation, &id))
        .await
        .unwrap_err();

    assert!(!err.is_user_error());
    assert!(matches!(err, QmsError::BackingStore(StoreError::Transport { .. })));
}

#[tokio::test]
async fn admin_fails_when_any_table_fails() {
    let mut store = MockStore::new();
    store.expect_get_all_values().returning(|table| {
        if table.as_str() == RecordType::ChangeControl.slug() {
            Err(StoreError::TableNotFound(table.clone()))
        } else {
            Ok(Vec::new())
        }
    });

    let err = service(store).admin().open(ADMIN_PASSWORD).await.unwrap_err();
    assert!(matches!(
        err,
        QmsError::BackingStore(StoreError::TableNotFound(_))
    ));
}

#[tokio::test]
async fn denied_admin_never_touches_store() {
    let mut store = MockStore::new();
    store.expect_get_all_values().never();

    let err = service(store).admin().open("wrong").await.unwrap_err();
    assert!(matches!(err, QmsError::AccessDenied));
}

#[tokio::test]
async fn header_insert_failure_stops_setup() {
    let mut store = MockStore::new();
    store.expect_get_all_values().times(1).returning(|_| Ok(Vec::new()));
    store
        .expect_insert_row()
        .times(1)
        .returning(|table, _, _| Err(StoreError::Setup(format!("{table} is read-only"))));

    let err = service(store).ensure_headers().await.unwrap_err();
    assert!(matches!(err, QmsError::BackingStore(StoreError::Setup(_))));
}
