use serde::{Deserialize, Serialize};

/// An issue that slipped past its target date, as shown in the
/// per-resource info panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayedIssue {
    pub title: String,
    pub url: Option<String>,
}

/// One labeled figure's worth of data: a resource assigned to a
/// project, with the fraction of their bandwidth it consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    /// 0..1 fraction of this resource's bandwidth spent on the project.
    pub bandwidth: f64,
    pub delayed_issues: Vec<DelayedIssue>,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, bandwidth: f64) -> Self {
        Self {
            name: name.into(),
            bandwidth,
            delayed_issues: Vec::new(),
        }
    }

    pub fn with_issues(mut self, issues: Vec<DelayedIssue>) -> Self {
        self.delayed_issues = issues;
        self
    }
}
