//! UI/backend events and error modeling for the dashboard controller.

use client_core::{IngestError, ProjectIndex};
use shared::protocol::ResourceDetail;

pub enum UiEvent {
    Info(String),
    ResourceDetailsLoaded {
        details: Vec<ResourceDetail>,
        index: ProjectIndex,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Backend,
    Payload,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FetchResourceDetails,
    General,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Backend => "Backend",
        UiErrorCategory::Payload => "Payload",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_ingest(context: UiErrorContext, err: &IngestError) -> Self {
        let category = match err {
            IngestError::Transport(_) => UiErrorCategory::Transport,
            IngestError::Status(_) => UiErrorCategory::Backend,
            IngestError::Decode(_) | IngestError::Shape(_) => UiErrorCategory::Payload,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Classification fallback for plain-string failures (worker
    /// startup, queue plumbing) where no typed error exists.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("unreachable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Payload
        } else if message_lower.contains("http") || message_lower.contains("status") {
            UiErrorCategory::Backend
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
