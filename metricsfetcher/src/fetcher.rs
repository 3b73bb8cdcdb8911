use chrono::Utc;
use metricsfetcher_store::CoordinationStore;
use tracing::info;

use crate::errors::Result;
use crate::metrics::{map_broker_storage, map_partition_size, MetricsSource};
use crate::publisher::{PublishOutcome, Publisher};
use crate::service_configuration::FetcherConfig;

/// What a completed run fetched and where it went.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub brokers: usize,
    pub topics: usize,
    pub partitions: usize,
    pub outcome: PublishOutcome,
}

/// One synchronization pass: query both metric families, reshape, publish.
pub struct Fetcher<M, S> {
    source: M,
    publisher: Publisher<S>,
    config: FetcherConfig,
}

impl<M: MetricsSource, S: CoordinationStore> Fetcher<M, S> {
    pub fn new(source: M, publisher: Publisher<S>, config: FetcherConfig) -> Self {
        Fetcher {
            source,
            publisher,
            config,
        }
    }

    pub fn publisher(&self) -> &Publisher<S> {
        &self.publisher
    }

    pub async fn run(&self) -> Result<RunSummary> {
        // Both families are evaluated at the same instant.
        let at = Utc::now();

        let broker_result = self
            .source
            .query_instant(&self.config.broker_storage_query, at)
            .await?;
        let partition_result = self
            .source
            .query_instant(&self.config.partition_size_query, at)
            .await?;

        let brokers = map_broker_storage(
            &broker_result,
            &self.config.broker_id_label,
            self.config.broker_id_map.as_ref(),
        )?;
        let partitions = map_partition_size(&partition_result);

        let partition_count = partitions.values().map(|p| p.len()).sum();
        info!(
            brokers = brokers.len(),
            topics = partitions.len(),
            partitions = partition_count,
            "fetched metrics"
        );

        let outcome = self
            .publisher
            .publish(&brokers, &partitions, self.config.dry_run)
            .await?;

        Ok(RunSummary {
            brokers: brokers.len(),
            topics: partitions.len(),
            partitions: partition_count,
            outcome,
        })
    }
}
