//! Snapshot documents consumed by topicmappr.
//!
//! Field names and nesting are the downstream schema and must not change:
//! `brokermetrics` is `{"<broker id>": {"StorageFree": <bytes>}}` and
//! `partitionmeta` is `{"<topic>": {"<partition>": {"Size": <bytes>}}}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrokerStorage {
    #[serde(rename = "StorageFree")]
    pub storage_free: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionSize {
    #[serde(rename = "Size")]
    pub size: f64,
}

/// Broker ID -> free storage in bytes.
pub type BrokerStorageFree = BTreeMap<String, BrokerStorage>;

/// Partition number (as string) -> size in bytes.
pub type PartitionSizes = BTreeMap<String, PartitionSize>;

/// Topic -> partition -> size in bytes.
pub type TopicPartitionSize = BTreeMap<String, PartitionSizes>;
