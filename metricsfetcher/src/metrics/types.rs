//! Query result types, plus the Prometheus HTTP API envelope they are decoded from

use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::{FetcherError, Result};

/// One labeled value of an instant vector.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub labels: HashMap<String, String>,
    pub value: f64,
}

impl Sample {
    pub fn new<K, V>(labels: impl IntoIterator<Item = (K, V)>, value: f64) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Sample {
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            value,
        }
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

/// Result shapes that carry no per-sample labels usable as map keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    Matrix,
    Scalar,
    String,
}

/// Result of an instant query.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryResult {
    Vector(Vec<Sample>),
    /// Any other result type: nothing to map this cycle.
    Unsupported(ResultKind),
}

// ===== Prometheus HTTP API envelope =====

#[derive(Debug, Deserialize)]
pub(crate) struct PromResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<PromData>,
    #[serde(rename = "errorType", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub(crate) enum PromData {
    Vector(Vec<PromSample>),
    Matrix(serde_json::Value),
    Scalar(serde_json::Value),
    String(serde_json::Value),
}

#[derive(Debug, Deserialize)]
pub(crate) struct PromSample {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    /// `[<unix seconds>, "<value>"]`
    pub value: (f64, String),
}

impl PromResponse {
    /// Convert a decoded envelope for `query` into a QueryResult.
    pub(crate) fn into_result(self, query: &str) -> Result<QueryResult> {
        if self.status != "success" {
            let reason = match (self.error_type, self.error) {
                (Some(kind), Some(msg)) => format!("{}: {}", kind, msg),
                (None, Some(msg)) => msg,
                (Some(kind), None) => kind,
                (None, None) => format!("status {}", self.status),
            };
            return Err(FetcherError::query(query, reason));
        }

        match self.data {
            Some(PromData::Vector(samples)) => samples
                .into_iter()
                .map(|s| -> Result<Sample> {
                    let value = parse_sample_value(&s.value.1).ok_or_else(|| {
                        FetcherError::query(query, format!("invalid sample value {:?}", s.value.1))
                    })?;
                    Ok(Sample {
                        labels: s.metric,
                        value,
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(QueryResult::Vector),
            Some(PromData::Matrix(_)) => Ok(QueryResult::Unsupported(ResultKind::Matrix)),
            Some(PromData::Scalar(_)) => Ok(QueryResult::Unsupported(ResultKind::Scalar)),
            Some(PromData::String(_)) => Ok(QueryResult::Unsupported(ResultKind::String)),
            None => Err(FetcherError::query(query, "response carried no data")),
        }
    }
}

/// Prometheus encodes values as strings, including `NaN`, `+Inf` and `-Inf`.
fn parse_sample_value(raw: &str) -> Option<f64> {
    match raw {
        "+Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => raw.parse::<f64>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Result<QueryResult> {
        let resp: PromResponse = serde_json::from_str(body).unwrap();
        resp.into_result("q")
    }

    #[test]
    fn decodes_vector_result() {
        let body = r#"{
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    {"metric": {"topic": "t1", "partition": "0"}, "value": [1700000000.123, "100"]},
                    {"metric": {"topic": "t1", "partition": "1"}, "value": [1700000000.123, "2.5e3"]}
                ]
            }
        }"#;

        let result = decode(body).unwrap();
        assert_eq!(
            result,
            QueryResult::Vector(vec![
                Sample::new([("topic", "t1"), ("partition", "0")], 100.0),
                Sample::new([("topic", "t1"), ("partition", "1")], 2500.0),
            ])
        );
    }

    #[test]
    fn other_result_types_are_unsupported() {
        let scalar = r#"{"status":"success","data":{"resultType":"scalar","result":[1700000000,"4"]}}"#;
        assert_eq!(
            decode(scalar).unwrap(),
            QueryResult::Unsupported(ResultKind::Scalar)
        );

        let matrix = r#"{"status":"success","data":{"resultType":"matrix","result":[]}}"#;
        assert_eq!(
            decode(matrix).unwrap(),
            QueryResult::Unsupported(ResultKind::Matrix)
        );
    }

    #[test]
    fn error_envelope_is_query_failure() {
        let body = r#"{"status":"error","errorType":"bad_data","error":"parse error at char 4"}"#;
        match decode(body) {
            Err(FetcherError::QueryFailure { query, reason }) => {
                assert_eq!(query, "q");
                assert_eq!(reason, "bad_data: parse error at char 4");
            }
            other => panic!("expected QueryFailure, got {:?}", other),
        }
    }

    #[test]
    fn unparsable_value_is_query_failure() {
        let body = r#"{"status":"success","data":{"resultType":"vector","result":[{"metric":{},"value":[1,"lots"]}]}}"#;
        assert!(matches!(decode(body), Err(FetcherError::QueryFailure { .. })));
    }

    #[test]
    fn special_float_values() {
        assert_eq!(parse_sample_value("+Inf"), Some(f64::INFINITY));
        assert_eq!(parse_sample_value("-Inf"), Some(f64::NEG_INFINITY));
        assert!(parse_sample_value("NaN").unwrap().is_nan());
        assert_eq!(parse_sample_value("42"), Some(42.0));
    }
}
