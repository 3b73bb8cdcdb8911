use clap::Parser;
use std::path::PathBuf;

/// Command line flags, each with a `METRICSFETCHER_*` environment fallback.
#[derive(Debug, Parser)]
#[command(name = "metricsfetcher")]
#[command(about = "Fetch broker storage and partition size metrics from Prometheus and publish them for topicmappr", long_about = None)]
#[command(version)]
pub struct Args {
    /// Prometheus URL
    #[arg(long, env = "METRICSFETCHER_PROMETHEUS_URL")]
    pub prometheus_url: String,

    /// Timeout for each Prometheus query, in seconds
    #[arg(long, env = "METRICSFETCHER_PROMETHEUS_QUERY_TIMEOUT", default_value_t = 30)]
    pub prometheus_query_timeout: u64,

    /// ZooKeeper connect string, optionally followed by a chroot (host:port/chroot)
    #[arg(long, env = "METRICSFETCHER_ZK_ADDR", default_value = "zookeeper:2181")]
    pub zk_addr: String,

    /// ZooKeeper session timeout, in seconds
    #[arg(long, env = "METRICSFETCHER_ZK_SESSION_TIMEOUT", default_value_t = 20)]
    pub zk_session_timeout: u64,

    /// Prometheus query to get partition size by topic
    #[arg(long, env = "METRICSFETCHER_PARTITION_SIZE_QUERY")]
    pub partition_size_query: String,

    /// Prometheus query to get broker storage free space
    #[arg(long, env = "METRICSFETCHER_BROKER_STORAGE_QUERY")]
    pub broker_storage_query: String,

    /// Prometheus label for broker ID
    #[arg(long, env = "METRICSFETCHER_BROKER_ID_LABEL", default_value = "broker_id")]
    pub broker_id_label: String,

    /// YAML file mapping broker ID label values (e.g. IP addresses) to broker IDs
    #[arg(long, env = "METRICSFETCHER_BROKER_ID_MAP")]
    pub broker_id_map: Option<PathBuf>,

    /// Gzip the data written to ZooKeeper
    #[arg(long, env = "METRICSFETCHER_COMPRESSION")]
    pub compression: bool,

    /// Fetch the metrics but don't write them to ZooKeeper, instead print them
    #[arg(long, env = "METRICSFETCHER_DRY_RUN")]
    pub dry_run: bool,
}
