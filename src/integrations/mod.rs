//! Integration services for external systems
//!
//! - `ollama`: structured ticket generation on the LLM server
//! - `jira`: ticket creation and the rest of the issue tracker surface
//!
//! Every call is a single request/response with no retries. Failures are
//! reported as [`IntegrationError`] and mapped to HTTP responses by the API
//! layer.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{GeneratedContent, NewIssue};

pub mod jira;
pub mod ollama;

pub use jira::{Attachment, Comment, Issue, JiraClient};
pub use ollama::{model_matches, OllamaClient};

/// Common integration error type
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Model {0} is not available on the Ollama server. Please ensure the model is installed.")]
    ModelUnavailable(String),

    #[error("{service} is unreachable: {message}")]
    UpstreamUnreachable {
        service: &'static str,
        message: String,
    },

    #[error("Failed to parse Ollama response: {0}")]
    MalformedOutput(String),

    #[error("{service} error: {status} - {message}")]
    UpstreamError {
        service: &'static str,
        status: u16,
        message: String,
    },
}

impl IntegrationError {
    pub(crate) fn unreachable(service: &'static str, err: reqwest::Error) -> Self {
        IntegrationError::UpstreamUnreachable {
            service,
            message: err.to_string(),
        }
    }

    pub fn is_malformed_output(&self) -> bool {
        matches!(self, IntegrationError::MalformedOutput(_))
    }
}

/// Turns a free-text request into ticket content
#[async_trait]
pub trait TicketGenerator: Send + Sync {
    /// Whether the configured model can be used right now
    async fn model_available(&self) -> Result<bool, IntegrationError>;

    /// Generate a summary/description preview for `prompt`
    async fn generate_preview(
        &self,
        prompt: &str,
        user_story: bool,
    ) -> Result<GeneratedContent, IntegrationError>;
}

/// Files tickets in the issue tracker
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Create an issue and return its key
    async fn create_issue(&self, issue: &NewIssue) -> Result<String, IntegrationError>;

    /// Human-facing URL of an issue
    fn browse_url(&self, key: &str) -> String;
}

/// Read a non-2xx response into an `UpstreamError`, or pass the response on
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, IntegrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::warn!("{} responded with {}: {}", service, status, message);
    Err(IntegrationError::UpstreamError {
        service,
        status: status.as_u16(),
        message,
    })
}
