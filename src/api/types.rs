//! API request/response types

use serde::{Deserialize, Serialize};

use crate::domain::GeneratedContent;

pub use crate::domain::{PreviewRequest, TicketRequest};

/// Response of `POST /preview-ticket`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub generated_content: Option<GeneratedContent>,
    pub error: Option<String>,
}

impl PreviewResponse {
    pub fn ok(content: GeneratedContent) -> Self {
        Self {
            success: true,
            generated_content: Some(content),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            generated_content: None,
            error: Some(error.into()),
        }
    }
}

/// Response of `POST /create-ticket`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketResponse {
    pub success: bool,
    pub jira_key: Option<String>,
    pub jira_url: Option<String>,
    pub error: Option<String>,
}

impl TicketResponse {
    pub fn created(key: String, url: String) -> Self {
        Self {
            success: true,
            jira_key: Some(key),
            jira_url: Some(url),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            jira_key: None,
            jira_url: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Error,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub ollama_host: String,
    pub default_model: String,
    pub model_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
