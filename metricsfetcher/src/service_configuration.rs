use metricsfetcher_store::StoreAddress;
use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

use crate::args_parse::Args;
use crate::errors::{FetcherError, Result};
use crate::metrics::BrokerIdTranslation;

/// Validated settings for one run, passed explicitly to the clients and the Fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Prometheus base URL
    pub prometheus_url: String,
    /// Per-query timeout
    pub query_timeout: Duration,
    /// ZooKeeper hosts and optional chroot
    pub store_address: StoreAddress,
    pub session_timeout: Duration,
    pub partition_size_query: String,
    pub broker_storage_query: String,
    /// Label carrying the broker ID (or the raw value to translate)
    pub broker_id_label: String,
    /// Raw label value -> broker ID, when the label is not the ID itself
    pub broker_id_map: Option<BrokerIdTranslation>,
    /// Gzip payloads before writing
    pub compression: bool,
    pub dry_run: bool,
}

/// Transform the parsed flags into a FetcherConfig, loading the broker ID map if given
impl TryFrom<Args> for FetcherConfig {
    type Error = FetcherError;

    fn try_from(args: Args) -> Result<Self> {
        let prometheus_url = require("prometheus-url", args.prometheus_url)?;
        let partition_size_query = require("partition-size-query", args.partition_size_query)?;
        let broker_storage_query = require("broker-storage-query", args.broker_storage_query)?;
        let broker_id_label = require("broker-id-label", args.broker_id_label)?;

        if args.zk_addr.trim().is_empty() {
            return Err(FetcherError::Config(
                "please provide the zookeeper host with --zk-addr".to_string(),
            ));
        }
        let store_address = StoreAddress::parse(&args.zk_addr)
            .map_err(|e| FetcherError::Config(e.to_string()))?;

        let broker_id_map = args
            .broker_id_map
            .as_deref()
            .map(load_broker_id_map)
            .transpose()?;

        Ok(FetcherConfig {
            prometheus_url,
            query_timeout: Duration::from_secs(args.prometheus_query_timeout),
            store_address,
            session_timeout: Duration::from_secs(args.zk_session_timeout),
            partition_size_query,
            broker_storage_query,
            broker_id_label,
            broker_id_map,
            compression: args.compression,
            dry_run: args.dry_run,
        })
    }
}

fn require(flag: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(FetcherError::Config(format!("please provide --{}", flag)));
    }
    Ok(value)
}

/// Read a YAML mapping of raw label value -> broker ID, e.g. `10.0.0.1: 1001`.
pub fn load_broker_id_map(path: &Path) -> Result<BrokerIdTranslation> {
    let content = read_to_string(path).map_err(|e| {
        FetcherError::Config(format!(
            "unable to read broker ID map {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_yaml::from_str(&content).map_err(|e| {
        FetcherError::Config(format!(
            "invalid broker ID map {}: {}",
            path.display(),
            e
        ))
    })
}
