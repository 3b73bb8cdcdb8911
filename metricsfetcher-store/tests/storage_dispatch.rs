//! # CoordinationStorage dispatch
//!
//! The binary talks to the store through the `CoordinationStorage` enum; these
//! tests drive the in-memory variant through the trait to check that every
//! operation is forwarded and that error kinds survive the dispatch.

use metricsfetcher_store::{
    Acl, CoordinationStorage, CoordinationStore, MemoryStore, Permission, StoreError,
};

/// **What**: create → get_data → get_acl → delete through the enum.
///
/// **Checks**:
/// - payload and ACL come back as written
/// - the node is gone after delete and a second delete reports NoNode
#[tokio::test]
async fn node_lifecycle_through_enum() {
    let storage = CoordinationStorage::InMemory(MemoryStore::new());

    storage
        .create("/topicmappr", &[], &[Acl::open()])
        .await
        .unwrap();
    storage
        .create("/topicmappr/brokermetrics", br#"{"1":{"StorageFree":1}}"#, &[Acl::open()])
        .await
        .unwrap();

    let data = storage.get_data("/topicmappr/brokermetrics").await.unwrap();
    assert_eq!(data, br#"{"1":{"StorageFree":1}}"#.to_vec());
    assert_eq!(
        storage.get_acl("/topicmappr").await.unwrap(),
        vec![Acl::world(Permission::ALL)]
    );

    storage.delete("/topicmappr/brokermetrics").await.unwrap();
    let err = storage.delete("/topicmappr/brokermetrics").await.unwrap_err();
    assert!(matches!(err, StoreError::NoNode(ref p) if p == "/topicmappr/brokermetrics"));

    storage.close().await.unwrap();
}

#[tokio::test]
async fn duplicate_create_reports_node_exists() {
    let storage = CoordinationStorage::InMemory(MemoryStore::new());
    storage
        .create("/topicmappr", &[], &[Acl::open()])
        .await
        .unwrap();

    let err = storage
        .create("/topicmappr", &[], &[Acl::open()])
        .await
        .unwrap_err();
    assert!(err.is_node_exists());
}
