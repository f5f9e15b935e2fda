//! Application core for the delivery-metrics dashboard: backend
//! ingestion, project/resource indexing, and the scene transition
//! machinery consumed by the GUI.

pub mod sequencer;
pub mod slots;
pub mod spring;

use std::collections::HashMap;

use reqwest::Client;
use shared::{
    domain::ResourceRecord,
    protocol::{resource_details_from_value, PayloadShapeError, ResourceDetail},
};
use thiserror::Error;

pub use sequencer::{
    EntityMotion, SceneEntity, SelectionSequencer, TransitionPhase, TRANSITION_DURATION,
};
pub use slots::{SlotTransform, PREDEFINED_SLOTS, TRANSITION_OFFSET};
pub use spring::Spring;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to reach metrics backend: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("metrics backend returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("metrics payload is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
    #[error(transparent)]
    Shape(#[from] PayloadShapeError),
}

/// Thin client for the metrics backend. One call, one endpoint; any
/// transport, status, or decode problem is terminal for that attempt
/// and nothing is retried.
pub struct MetricsClient {
    http: Client,
    base_url: String,
}

impl MetricsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_resource_details(&self) -> Result<Vec<ResourceDetail>, IngestError> {
        let url = format!("{}/v1/resource-details", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(IngestError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status(status));
        }
        let body: serde_json::Value = response.json().await.map_err(IngestError::Decode)?;
        let details = resource_details_from_value(body)?;
        tracing::debug!(resource_count = details.len(), "fetched resource details");
        Ok(details)
    }
}

/// Ordered list of resources assigned to one project, plus the sum of
/// their positive bandwidth contributions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectEntry {
    pub resources: Vec<ResourceRecord>,
    pub total_bandwidth: f64,
}

/// Mapping from project key to its resources, rebuilt once per
/// successful fetch and read-only afterwards. Key order is
/// first-encounter order while scanning the payload, which is what
/// drives the selector list and the initial auto-selection.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    keys: Vec<String>,
    projects: HashMap<String, ProjectEntry>,
}

impl ProjectIndex {
    /// Flattens the payload: every breakdown entry with a fraction
    /// above zero assigns that resource to the project, in payload
    /// order. Zero or negative fractions contribute nothing, to the
    /// resource list or to the total.
    pub fn from_details(details: &[ResourceDetail]) -> Self {
        let mut index = Self::default();
        for detail in details {
            for (project, &fraction) in &detail.current_projects_bandwidth_breakdown {
                if fraction <= 0.0 {
                    continue;
                }
                let entry = index.entry_mut(project);
                entry.resources.push(
                    ResourceRecord::new(detail.resource.clone(), fraction).with_issues(
                        detail
                            .delayed_issues
                            .iter()
                            .cloned()
                            .map(Into::into)
                            .collect(),
                    ),
                );
                entry.total_bandwidth += fraction;
            }
        }
        index
    }

    fn entry_mut(&mut self, project: &str) -> &mut ProjectEntry {
        if !self.projects.contains_key(project) {
            self.keys.push(project.to_string());
        }
        self.projects.entry(project.to_string()).or_default()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn first_key(&self) -> Option<&str> {
        self.keys.first().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.projects.contains_key(key)
    }

    pub fn resources(&self, key: &str) -> Option<&[ResourceRecord]> {
        self.projects.get(key).map(|entry| entry.resources.as_slice())
    }

    pub fn total_bandwidth(&self, key: &str) -> Option<f64> {
        self.projects.get(key).map(|entry| entry.total_bandwidth)
    }

    pub fn project_count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
