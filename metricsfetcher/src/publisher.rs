//! Publishing of the two snapshot documents to the coordination store.
//!
//! Every run replaces `partitionmeta` then `brokermetrics` under
//! `<chroot>/topicmappr`. Per node: delete the old node (missing is fine),
//! check the directory ACL (create the directory with the open ACL if it is
//! missing), then create the node fresh. The first failure stops the publish.
//!
//! The directory ACL is also checked once before anything is deleted, so a
//! directory owned by someone else never loses its data nodes. Snapshots
//! holding NaN or infinite values are rejected before the store is touched.

mod report;
pub use report::{humanize_bytes, render_report};

use flate2::{write::GzEncoder, Compression};
use metricsfetcher_store::{Acl, CoordinationStore};
use std::io::Write;
use tracing::{debug, info, warn};

use crate::errors::{FetcherError, Result};
use crate::model::{BrokerStorageFree, TopicPartitionSize};

/// Directory holding the snapshots, relative to the chroot.
pub const ROOT_PATH: &str = "/topicmappr";
pub const PARTITION_META_NODE: &str = "partitionmeta";
pub const BROKER_METRICS_NODE: &str = "brokermetrics";

#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// Nothing was written; the rendered report of what would have been.
    DryRun { report: String },
    /// Full paths of the nodes written, in write order.
    Written { paths: Vec<String> },
}

pub struct Publisher<S> {
    store: S,
    chroot: Option<String>,
    compress: bool,
}

impl<S: CoordinationStore> Publisher<S> {
    pub fn new(store: S, chroot: Option<String>, compress: bool) -> Self {
        Publisher {
            store,
            chroot,
            compress,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `<chroot>/topicmappr`
    pub fn directory(&self) -> String {
        match &self.chroot {
            Some(chroot) => format!("{}{}", chroot, ROOT_PATH),
            None => ROOT_PATH.to_string(),
        }
    }

    pub fn node_path(&self, name: &str) -> String {
        format!("{}/{}", self.directory(), name)
    }

    pub async fn publish(
        &self,
        brokers: &BrokerStorageFree,
        partitions: &TopicPartitionSize,
        dry_run: bool,
    ) -> Result<PublishOutcome> {
        check_finite(brokers, partitions)?;

        let partition_data = serde_json::to_vec(partitions)?;
        let broker_data = serde_json::to_vec(brokers)?;

        if dry_run {
            return Ok(PublishOutcome::DryRun {
                report: render_report(brokers, partitions),
            });
        }

        self.preflight(&self.directory()).await?;

        let mut paths = Vec::with_capacity(2);
        for (name, data) in [
            (PARTITION_META_NODE, partition_data),
            (BROKER_METRICS_NODE, broker_data),
        ] {
            paths.push(self.write_node(name, &data).await?);
        }

        Ok(PublishOutcome::Written { paths })
    }

    async fn write_node(&self, name: &str, data: &[u8]) -> Result<String> {
        let dir = self.directory();
        let path = self.node_path(name);

        // Remove the old node.
        match self.store.delete(&path).await {
            Ok(()) => debug!(path = %path, "deleted previous node"),
            Err(e) if e.is_no_node() => {}
            Err(e) => return Err(FetcherError::store("delete path", &path, e)),
        }

        self.ensure_directory(&dir).await?;

        let payload = self.encode(data)?;

        info!(path = %path, bytes = payload.len(), "writing data to {}", path);
        match self.store.create(&path, &payload, &[Acl::open()]).await {
            Ok(()) => {
                self.verify(&path, &payload).await;
                Ok(path)
            }
            Err(e) if e.is_node_exists() => Err(FetcherError::NodeConflict { path }),
            Err(e) => Err(FetcherError::store("create path", &path, e)),
        }
    }

    /// Read the node back after a write. Only logs; the write already succeeded.
    async fn verify(&self, path: &str, written: &[u8]) {
        match self.store.get_data(path).await {
            Ok(stored) if stored == written => {
                debug!(path = %path, bytes = stored.len(), "verified node contents")
            }
            Ok(stored) => warn!(
                path = %path,
                written = written.len(),
                stored = stored.len(),
                "node contents differ from what was written"
            ),
            Err(e) => warn!(path = %path, error = %e, "unable to read back node"),
        }
    }

    /// Fail before touching any node if the directory exists without the open ACL.
    async fn preflight(&self, dir: &str) -> Result<()> {
        match self.store.get_acl(dir).await {
            Ok(acl) => require_open(dir, acl),
            Err(e) if e.is_no_node() => Ok(()),
            Err(e) => Err(FetcherError::store("get acl of node", dir, e)),
        }
    }

    /// Create the directory with the open ACL if missing, otherwise require the open ACL on it.
    async fn ensure_directory(&self, dir: &str) -> Result<()> {
        match self.store.get_acl(dir).await {
            Ok(acl) => require_open(dir, acl),
            Err(e) if e.is_no_node() => {
                info!(path = %dir, "creating directory node");
                match self.store.create(dir, &[], &[Acl::open()]).await {
                    Ok(()) => Ok(()),
                    // Lost a creation race with another writer.
                    Err(e) if e.is_node_exists() => Ok(()),
                    Err(e) => Err(FetcherError::store("create node", dir, e)),
                }
            }
            Err(e) => Err(FetcherError::store("get acl of node", dir, e)),
        }
    }

    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if !self.compress {
            return Ok(data.to_vec());
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }
}

/// JSON has no NaN or infinity; serde_json would write them as `null`.
fn check_finite(brokers: &BrokerStorageFree, partitions: &TopicPartitionSize) -> Result<()> {
    let broker_values = brokers
        .iter()
        .map(|(id, b)| (format!("broker {}", id), b.storage_free));
    let partition_values = partitions.iter().flat_map(|(topic, sizes)| {
        sizes
            .iter()
            .map(move |(partition, p)| (format!("{}/{}", topic, partition), p.size))
    });

    match broker_values
        .chain(partition_values)
        .find(|(_, value)| !value.is_finite())
    {
        Some((key, value)) => Err(FetcherError::NonFiniteValue { key, value }),
        None => Ok(()),
    }
}

fn require_open(dir: &str, acl: Vec<Acl>) -> Result<()> {
    if acl.iter().any(Acl::is_open) {
        Ok(())
    } else {
        Err(FetcherError::AclMismatch {
            path: dir.to_string(),
            acl,
        })
    }
}
