use async_trait::async_trait;

use super::acl::Acl;
use super::errors::Result;

/// The node operations the publisher needs from a hierarchical coordination store.
///
/// Every operation distinguishes a missing node (`StoreError::NoNode`) from other failures.
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    /// Remove a node regardless of its version.
    async fn delete(&self, path: &str) -> Result<()>;

    async fn get_acl(&self, path: &str) -> Result<Vec<Acl>>;

    /// Create a persistent node. Fails with `NodeExists` if the node is present
    /// and with `NoNode` if its parent is missing.
    async fn create(&self, path: &str, data: &[u8], acl: &[Acl]) -> Result<()>;

    async fn get_data(&self, path: &str) -> Result<Vec<u8>>;
}
