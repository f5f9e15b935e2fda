//! Wire types for the metrics backend's `/v1/resource-details` payload.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::DelayedIssue;

/// One delayed issue as the backend spells it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DelayedIssueWire {
    pub issue_title: String,
    pub issue_url: Option<String>,
}

impl From<DelayedIssueWire> for DelayedIssue {
    fn from(wire: DelayedIssueWire) -> Self {
        Self {
            title: wire.issue_title,
            url: wire.issue_url,
        }
    }
}

/// One resource entry from the backend payload. The bandwidth
/// breakdown preserves the backend's key order; project ordering in
/// the UI is derived from it.
///
/// Everything except `resource` and the breakdown is peripheral
/// display data for the table view, so partial payloads still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceDetail {
    pub resource: String,
    pub current_projects_bandwidth_breakdown: IndexMap<String, f64>,
    pub delayed_issues: Vec<DelayedIssueWire>,
    pub bandwidth_today: Option<f64>,
    pub closing_rate: Option<f64>,
    pub closed_issues: Option<u64>,
    pub cost: Option<f64>,
    pub current_projects_count: Option<u64>,
    pub all_projects_count: Option<u64>,
}

#[derive(Debug, Error)]
pub enum PayloadShapeError {
    #[error("payload has no resource array under `resourceDetails`, `data`, or the top level")]
    MissingResourceArray,
    #[error("resource entry is malformed: {0}")]
    MalformedEntry(#[from] serde_json::Error),
}

/// Pulls the resource array out of a response body. The backend has
/// shipped three shapes over time: `{"resourceDetails": [...]}`,
/// `{"data": [...]}`, and a bare top-level array; all are accepted.
pub fn resource_details_from_value(value: Value) -> Result<Vec<ResourceDetail>, PayloadShapeError> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut body) => match body
            .remove("resourceDetails")
            .or_else(|| body.remove("data"))
        {
            Some(Value::Array(entries)) => entries,
            _ => return Err(PayloadShapeError::MissingResourceArray),
        },
        _ => return Err(PayloadShapeError::MissingResourceArray),
    };

    entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).map_err(PayloadShapeError::from))
        .collect()
}
