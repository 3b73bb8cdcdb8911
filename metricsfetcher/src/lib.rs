//! Fetches per-broker free storage and per-partition sizes from Prometheus and
//! publishes them to ZooKeeper in the format topicmappr reads.

pub mod args_parse;
pub mod errors;
pub mod fetcher;
pub mod metrics;
pub mod model;
pub mod publisher;
pub mod service_configuration;

pub use errors::{FetcherError, Result};
pub use fetcher::{Fetcher, RunSummary};
pub use publisher::{PublishOutcome, Publisher};
pub use service_configuration::FetcherConfig;
