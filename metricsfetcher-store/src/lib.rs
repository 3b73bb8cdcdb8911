//! Coordination store client used by metricsfetcher to publish its snapshots.
//!
//! The publisher only needs delete / get-ACL / create on a hierarchical store,
//! so that is all the `CoordinationStore` trait exposes.

mod acl;
pub use acl::{Acl, Permission};

mod address;
pub use address::StoreAddress;

mod errors;
pub use errors::{Result, StoreError};

mod store;
pub use store::CoordinationStore;

mod providers;
pub use providers::{in_memory::MemoryStore, zookeeper::ZooKeeperStore};

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub enum CoordinationStorage {
    ZooKeeper(ZooKeeperStore),
    InMemory(MemoryStore), // InMemory is used for testing and dry runs
}

#[async_trait]
impl CoordinationStore for CoordinationStorage {
    async fn delete(&self, path: &str) -> Result<()> {
        match self {
            CoordinationStorage::ZooKeeper(store) => store.delete(path).await,
            CoordinationStorage::InMemory(store) => store.delete(path).await,
        }
    }

    async fn get_acl(&self, path: &str) -> Result<Vec<Acl>> {
        match self {
            CoordinationStorage::ZooKeeper(store) => store.get_acl(path).await,
            CoordinationStorage::InMemory(store) => store.get_acl(path).await,
        }
    }

    async fn create(&self, path: &str, data: &[u8], acl: &[Acl]) -> Result<()> {
        match self {
            CoordinationStorage::ZooKeeper(store) => store.create(path, data, acl).await,
            CoordinationStorage::InMemory(store) => store.create(path, data, acl).await,
        }
    }

    async fn get_data(&self, path: &str) -> Result<Vec<u8>> {
        match self {
            CoordinationStorage::ZooKeeper(store) => store.get_data(path).await,
            CoordinationStorage::InMemory(store) => store.get_data(path).await,
        }
    }
}

impl CoordinationStorage {
    /// Ends the store session. A no-op for the in-memory backend.
    pub async fn close(&self) -> Result<()> {
        match self {
            CoordinationStorage::ZooKeeper(store) => store.close().await,
            CoordinationStorage::InMemory(_) => Ok(()),
        }
    }
}
