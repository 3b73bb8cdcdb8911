//! Reshaping of instant-vector samples into the snapshot documents.
//!
//! Duplicate keys in one result overwrite each other, the last sample wins.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::types::QueryResult;
use crate::errors::{FetcherError, Result};
use crate::model::{BrokerStorage, BrokerStorageFree, PartitionSize, TopicPartitionSize};

/// Raw label value (e.g. an IP address) -> broker ID.
pub type BrokerIdTranslation = HashMap<String, i32>;

/// Build the broker -> free storage map.
///
/// The broker ID is read from `id_label`. With a translation table every raw
/// label value must have an entry; a miss fails the whole mapping.
pub fn map_broker_storage(
    result: &QueryResult,
    id_label: &str,
    translation: Option<&BrokerIdTranslation>,
) -> Result<BrokerStorageFree> {
    let mut brokers = BrokerStorageFree::new();

    let samples = match result {
        QueryResult::Vector(samples) => samples,
        QueryResult::Unsupported(kind) => {
            warn!(kind = ?kind, "broker storage query did not return a vector");
            return Ok(brokers);
        }
    };

    for sample in samples {
        let Some(raw) = sample.label(id_label) else {
            warn!(label = id_label, labels = ?sample.labels, "skipping sample without broker ID label");
            continue;
        };

        let broker_id = match translation {
            Some(table) => table
                .get(raw)
                .map(|id| id.to_string())
                .ok_or_else(|| FetcherError::TranslationMiss(raw.to_string()))?,
            None => raw.to_string(),
        };

        brokers.insert(
            broker_id,
            BrokerStorage {
                storage_free: sample.value,
            },
        );
    }

    Ok(brokers)
}

/// Build the topic -> partition -> size map from samples labeled `topic` and `partition`.
pub fn map_partition_size(result: &QueryResult) -> TopicPartitionSize {
    let mut topics = TopicPartitionSize::new();

    let samples = match result {
        QueryResult::Vector(samples) => samples,
        QueryResult::Unsupported(kind) => {
            warn!(kind = ?kind, "partition size query did not return a vector");
            return topics;
        }
    };

    for sample in samples {
        let (Some(topic), Some(partition)) = (sample.label("topic"), sample.label("partition"))
        else {
            debug!(labels = ?sample.labels, "skipping sample without topic/partition labels");
            continue;
        };

        topics.entry(topic.to_string()).or_default().insert(
            partition.to_string(),
            PartitionSize { size: sample.value },
        );
    }

    topics
}
