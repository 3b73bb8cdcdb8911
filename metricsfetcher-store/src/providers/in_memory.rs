use crate::{
    acl::Acl,
    errors::{Result, StoreError},
    store::CoordinationStore,
};

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Node {
    data: Vec<u8>,
    acl: Vec<Acl>,
}

/// MemoryStore is a simple in-memory node tree that implements the CoordinationStore trait.
/// SHOULD BE USED ONLY FOR TESTING PURPOSES
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    nodes: Arc<DashMap<String, Node>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            nodes: Arc::new(DashMap::new()),
        }
    }

    /// Replace the ACL of an existing node, used to seed restricted directories in tests.
    pub fn set_acl(&self, path: &str, acl: Vec<Acl>) -> Result<()> {
        match self.nodes.get_mut(path) {
            Some(mut node) => {
                node.acl = acl;
                Ok(())
            }
            None => Err(StoreError::NoNode(path.to_string())),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        path == "/" || self.nodes.contains_key(path)
    }

    fn validate(path: &str) -> Result<()> {
        if !path.starts_with('/') || path.len() < 2 || path.ends_with('/') || path.contains("//")
        {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(())
    }

    fn parent(path: &str) -> &str {
        match path.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &path[..pos],
        }
    }

    fn has_children(&self, path: &str) -> bool {
        let prefix = format!("{}/", path);
        self.nodes.iter().any(|entry| entry.key().starts_with(&prefix))
    }
}

#[async_trait]
impl CoordinationStore for MemoryStore {
    async fn delete(&self, path: &str) -> Result<()> {
        Self::validate(path)?;

        if self.has_children(path) {
            return Err(StoreError::Backend(format!("node has children: {}", path)));
        }

        match self.nodes.remove(path) {
            Some(_) => Ok(()),
            None => Err(StoreError::NoNode(path.to_string())),
        }
    }

    async fn get_acl(&self, path: &str) -> Result<Vec<Acl>> {
        Self::validate(path)?;

        self.nodes
            .get(path)
            .map(|node| node.acl.clone())
            .ok_or_else(|| StoreError::NoNode(path.to_string()))
    }

    async fn create(&self, path: &str, data: &[u8], acl: &[Acl]) -> Result<()> {
        Self::validate(path)?;

        if !self.contains(Self::parent(path)) {
            return Err(StoreError::NoNode(path.to_string()));
        }

        match self.nodes.entry(path.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(StoreError::NodeExists(path.to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Node {
                    data: data.to_vec(),
                    acl: acl.to_vec(),
                });
                Ok(())
            }
        }
    }

    async fn get_data(&self, path: &str) -> Result<Vec<u8>> {
        Self::validate(path)?;

        self.nodes
            .get(path)
            .map(|node| node.data.clone())
            .ok_or_else(|| StoreError::NoNode(path.to_string()))
    }
}
