use metricsfetcher_store::{Acl, StoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetcherError>;

#[derive(Error, Debug)]
pub enum FetcherError {
    #[error("query `{query}` failed: {reason}")]
    QueryFailure { query: String, reason: String },

    #[error("no broker ID translation for label value `{0}`")]
    TranslationMiss(String),

    #[error("coordination store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("zookeeper node {path} has wrong ACL: {}", format_acl(.acl))]
    AclMismatch { path: String, acl: Vec<Acl> },

    #[error("unable to create path {path}: node already exists")]
    NodeConflict { path: String },

    #[error("unable to {op} {path}: {source}")]
    Store {
        op: &'static str,
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("refusing to publish non-finite value {value} for {key}")]
    NonFiniteValue { key: String, value: f64 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("compression error: {0}")]
    Compression(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FetcherError {
    pub(crate) fn query(query: &str, reason: impl ToString) -> Self {
        FetcherError::QueryFailure {
            query: query.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Wrap a store failure for `op` on `path`; a lost session stays distinguishable.
    pub(crate) fn store(op: &'static str, path: &str, source: StoreError) -> Self {
        match source {
            StoreError::Unavailable(reason) => FetcherError::StoreUnavailable(reason),
            source => FetcherError::Store {
                op,
                path: path.to_string(),
                source,
            },
        }
    }
}

fn format_acl(acl: &[Acl]) -> String {
    let entries: Vec<String> = acl.iter().map(ToString::to_string).collect();
    format!("[{}]", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metricsfetcher_store::Permission;

    #[test]
    fn unavailable_store_maps_to_store_unavailable() {
        let err = FetcherError::store(
            "delete",
            "/topicmappr/partitionmeta",
            StoreError::Unavailable("ConnectionLoss".into()),
        );
        assert!(matches!(err, FetcherError::StoreUnavailable(_)));

        let err = FetcherError::store(
            "delete",
            "/topicmappr/partitionmeta",
            StoreError::Backend("NoAuth".into()),
        );
        assert!(matches!(err, FetcherError::Store { op: "delete", .. }));
    }

    #[test]
    fn acl_mismatch_message_lists_entries() {
        let err = FetcherError::AclMismatch {
            path: "/topicmappr".into(),
            acl: vec![Acl::world(Permission::READ)],
        };
        assert_eq!(
            err.to_string(),
            "zookeeper node /topicmappr has wrong ACL: [world:anyone:1]"
        );
    }
}
