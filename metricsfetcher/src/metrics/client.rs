use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{PromResponse, QueryResult};
use crate::errors::{FetcherError, Result};

/// Anything that can evaluate an instant query.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn query_instant(&self, query: &str, at: DateTime<Utc>) -> Result<QueryResult>;
}

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Prometheus base URL, e.g. `http://prometheus:9090`
    pub base_url: String,
    /// Applied to each query independently
    pub timeout: Duration,
}

/// Prometheus HTTP API client (`/api/v1/query`).
#[derive(Clone, Debug)]
pub struct PrometheusClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl PrometheusClient {
    pub fn new(cfg: MetricsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| FetcherError::Config(format!("unable to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            timeout: cfg.timeout,
            http,
        })
    }

    fn query_url(&self) -> String {
        format!("{}/api/v1/query", self.base_url)
    }
}

#[async_trait]
impl MetricsSource for PrometheusClient {
    async fn query_instant(&self, query: &str, at: DateTime<Utc>) -> Result<QueryResult> {
        let time = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        debug!(query, time = %time, "running prometheus instant query");

        let resp = self
            .http
            .get(self.query_url())
            .query(&[("query", query), ("time", time.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetcherError::query(query, e))?;

        let status = resp.status();
        // Prometheus reports rejected queries as a JSON envelope on 4xx/5xx too.
        let body: PromResponse = match resp.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(FetcherError::query(query, format!("HTTP {}", status)))
            }
            Err(e) => return Err(FetcherError::query(query, e)),
        };

        if !body.warnings.is_empty() {
            warn!(query, warnings = ?body.warnings, "prometheus returned warnings");
        }

        body.into_result(query)
    }
}
