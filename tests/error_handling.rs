use std::sync::Arc;

use async_trait::async_trait;
use asset_sync::document::bson::{doc, oid::ObjectId};
use asset_sync::lookup::{CategoryRecord, FileTypeRecord, LookupKind, TagRecord, UserRecord};
use asset_sync::{
    AssetSync, ChangeEvent, DocumentError, EventError, OutputLine, ReferenceStore, StoreError,
    SyncError,
};

/// Every query fails at the transport level.
struct UnreachableStore;

#[async_trait]
impl ReferenceStore for UnreachableStore {
    async fn file_type(&self, _: ObjectId) -> Result<Option<FileTypeRecord>, StoreError> {
        Err(StoreError::Query("connection refused".into()))
    }
    async fn category(&self, _: ObjectId) -> Result<Option<CategoryRecord>, StoreError> {
        Err(StoreError::Query("connection refused".into()))
    }
    async fn tags(&self, _: &[ObjectId]) -> Result<Vec<TagRecord>, StoreError> {
        Err(StoreError::Cursor("connection reset".into()))
    }
    async fn users(&self, _: &[String]) -> Result<Vec<UserRecord>, StoreError> {
        Err(StoreError::Decode("bad name".into()))
    }
}

/// Panics on the tag query.
struct PanickingStore;

#[async_trait]
impl ReferenceStore for PanickingStore {
    async fn file_type(&self, _: ObjectId) -> Result<Option<FileTypeRecord>, StoreError> {
        Ok(None)
    }
    async fn category(&self, _: ObjectId) -> Result<Option<CategoryRecord>, StoreError> {
        Ok(None)
    }
    async fn tags(&self, _: &[ObjectId]) -> Result<Vec<TagRecord>, StoreError> {
        panic!("tag index corrupted")
    }
    async fn users(&self, _: &[String]) -> Result<Vec<UserRecord>, StoreError> {
        Ok(Vec::new())
    }
}

fn full_asset(id: ObjectId) -> asset_sync::Document {
    doc! {
        "_id": id,
        "org": "org-1",
        "filetype": ObjectId::new(),
        "tags": [ObjectId::new()],
        "users": ["a@x.com"],
    }
}

#[tokio::test]
async fn every_store_failure_is_aggregated() {
    let sync = AssetSync::new(Arc::new(UnreachableStore));
    let id = ObjectId::new();

    let err = sync.process(full_asset(id)).await.unwrap_err();

    let SyncError::Enrichment { failure, routing, .. } = err else {
        panic!("expected an enrichment failure");
    };
    assert_eq!(routing, "org-1");
    assert_eq!(failure.asset_id, id.to_hex());
    let kinds: Vec<LookupKind> = failure.causes.iter().map(|c| c.kind()).collect();
    assert_eq!(kinds, vec![LookupKind::FileType, LookupKind::Tags, LookupKind::Users]);

    let msg = failure.to_string();
    assert!(msg.starts_with(&format!(
        "syncing asset with ID {} failed with the following errors: ",
        id.to_hex()
    )));
    assert!(msg.contains("connection refused"));
    assert!(msg.contains("connection reset"));
    assert!(msg.contains("bad name"));
}

#[tokio::test]
async fn panic_during_processing_becomes_a_fault() {
    let sync = AssetSync::new(Arc::new(PanickingStore));
    let id = ObjectId::new();

    let err = sync.process(full_asset(id)).await.unwrap_err();

    match &err {
        SyncError::Fault { asset_id, message } => {
            assert_eq!(asset_id, &id.to_hex());
            assert_eq!(message, "tag index corrupted");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains(&id.to_hex()));
}

#[tokio::test]
async fn sync_keeps_working_after_a_fault() {
    let sync = AssetSync::new(Arc::new(PanickingStore));

    assert!(sync.process(full_asset(ObjectId::new())).await.is_err());

    // No tags, so the panicking query is never reached.
    let err = sync
        .process(doc! { "_id": ObjectId::new(), "org": "o", "filetype": ObjectId::new() })
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Enrichment { .. }));
}

#[tokio::test]
async fn missing_asset_id_is_invalid_document() {
    let sync = AssetSync::new(Arc::new(UnreachableStore));

    let err = sync
        .handle(ChangeEvent::insert(doc! { "org": "o" }))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SyncError::InvalidDocument(DocumentError::MissingField("_id".into()))
    );
    assert!(err.asset_id().is_none());
}

#[tokio::test]
async fn unreadable_org_names_the_asset() {
    let store = Arc::new(asset_sync::InMemoryReferenceStore::new());
    let sync = AssetSync::new(store.clone());
    let id = ObjectId::new();

    let err = sync
        .handle(ChangeEvent::insert(doc! { "_id": id, "org": 5 }))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::InvalidRouting { .. }));
    assert!(err.to_string().contains(&id.to_hex()));
    assert_eq!(err.asset_id(), Some(id.to_hex().as_str()));
    assert_eq!(store.query_count(), 0);

    let line = OutputLine::from_result(Err(err)).to_json();
    assert!(line.contains(&format!(r#""asset_id":"{}""#, id.to_hex())));
}

#[tokio::test]
async fn mistyped_filetype_is_reported_for_that_join_only() {
    let store = asset_sync::InMemoryReferenceStore::new();
    let sync = AssetSync::new(Arc::new(store));

    let err = sync
        .process(doc! { "_id": ObjectId::new(), "org": "o", "filetype": "pdf" })
        .await
        .unwrap_err();

    let SyncError::Enrichment { failure, .. } = err else {
        panic!("expected an enrichment failure");
    };
    assert_eq!(failure.causes.len(), 1);
    assert_eq!(failure.causes[0].kind(), LookupKind::FileType);
}

#[test]
fn malformed_event_lines() {
    assert!(matches!(
        ChangeEvent::from_json_line("not json"),
        Err(EventError::Json(_))
    ));
    assert!(matches!(
        ChangeEvent::from_json_line(r#"{"document":{}}"#),
        Err(EventError::Json(_))
    ));

    let err = ChangeEvent::from_json_line(r#"{"operation":"i","document":"x"}"#).unwrap_err();
    let line = OutputLine::from_event_error(&err);
    assert!(line.to_json().contains(r#""asset_id":null"#));
}
