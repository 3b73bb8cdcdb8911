#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metricsfetcher::metrics::{MetricsSource, QueryResult};
use metricsfetcher::{FetcherConfig, FetcherError};
use metricsfetcher_store::{
    Acl, CoordinationStore, MemoryStore, Result, StoreAddress, StoreError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BROKER_QUERY: &str = "node_filesystem_free_bytes{mountpoint=\"/data\"}";
pub const PARTITION_QUERY: &str = "kafka_log_log_size";

/// A store operation as seen by the RecordingStore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Delete(String),
    GetAcl(String),
    Create(String),
}

/// Which store error to inject.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    NoNode,
    NodeExists,
    Unavailable,
    Backend,
}

impl Fault {
    fn error(self, path: &str) -> StoreError {
        match self {
            Fault::NoNode => StoreError::NoNode(path.to_string()),
            Fault::NodeExists => StoreError::NodeExists(path.to_string()),
            Fault::Unavailable => StoreError::Unavailable("connection lost".to_string()),
            Fault::Backend => StoreError::Backend(format!("NoAuth ({})", path)),
        }
    }
}

/// MemoryStore wrapper that records every call and can fail chosen ones.
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    calls: Arc<Mutex<Vec<Call>>>,
    faults: Arc<Mutex<Vec<(Call, Fault)>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next matching call with `fault` (the call is still recorded).
    /// Registering the same call twice fails its next two occurrences.
    pub fn fail_on(&self, call: Call, fault: Fault) {
        self.faults.lock().unwrap().push((call, fault));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Option<Fault> {
        self.calls.lock().unwrap().push(call.clone());
        let mut faults = self.faults.lock().unwrap();
        let pos = faults.iter().position(|(c, _)| *c == call)?;
        Some(faults.remove(pos).1)
    }
}

#[async_trait]
impl CoordinationStore for RecordingStore {
    async fn delete(&self, path: &str) -> Result<()> {
        if let Some(fault) = self.record(Call::Delete(path.to_string())) {
            return Err(fault.error(path));
        }
        self.inner.delete(path).await
    }

    async fn get_acl(&self, path: &str) -> Result<Vec<Acl>> {
        if let Some(fault) = self.record(Call::GetAcl(path.to_string())) {
            return Err(fault.error(path));
        }
        self.inner.get_acl(path).await
    }

    async fn create(&self, path: &str, data: &[u8], acl: &[Acl]) -> Result<()> {
        if let Some(fault) = self.record(Call::Create(path.to_string())) {
            return Err(fault.error(path));
        }
        self.inner.create(path, data, acl).await
    }

    async fn get_data(&self, path: &str) -> Result<Vec<u8>> {
        self.inner.get_data(path).await
    }
}

/// MetricsSource answering from a fixed query -> result table.
#[derive(Clone, Default)]
pub struct StaticSource {
    results: HashMap<String, QueryResult>,
    failing: Vec<String>,
    pub queries: Arc<Mutex<Vec<(String, DateTime<Utc>)>>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, result: QueryResult) -> Self {
        self.results.insert(query.to_string(), result);
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }
}

#[async_trait]
impl MetricsSource for StaticSource {
    async fn query_instant(
        &self,
        query: &str,
        at: DateTime<Utc>,
    ) -> std::result::Result<QueryResult, FetcherError> {
        self.queries.lock().unwrap().push((query.to_string(), at));

        if self.failing.iter().any(|q| q == query) {
            return Err(FetcherError::QueryFailure {
                query: query.to_string(),
                reason: "connection refused".to_string(),
            });
        }

        Ok(self
            .results
            .get(query)
            .cloned()
            .unwrap_or(QueryResult::Vector(Vec::new())))
    }
}

pub fn config(dry_run: bool) -> FetcherConfig {
    FetcherConfig {
        prometheus_url: "http://prometheus:9090".to_string(),
        query_timeout: Duration::from_secs(30),
        store_address: StoreAddress {
            hosts: "zookeeper:2181".to_string(),
            chroot: None,
        },
        session_timeout: Duration::from_secs(20),
        partition_size_query: PARTITION_QUERY.to_string(),
        broker_storage_query: BROKER_QUERY.to_string(),
        broker_id_label: "broker_id".to_string(),
        broker_id_map: None,
        compression: false,
        dry_run,
    }
}
