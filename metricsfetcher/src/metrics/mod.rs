//! Instant queries against Prometheus and the mapping of their results
//! into the snapshot documents.

pub mod client;
pub mod mapper;
pub mod types;

pub use client::{MetricsSource, PrometheusClient};
pub use mapper::{map_broker_storage, map_partition_size, BrokerIdTranslation};
pub use types::{QueryResult, ResultKind, Sample};
