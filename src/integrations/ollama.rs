//! Ollama integration for structured ticket generation
//!
//! Talks to the Ollama HTTP API: `/api/tags` to check that the configured
//! model is installed and `/api/chat` with a JSON-schema `format` so the model
//! replies with a `{summary, description}` object.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_status, IntegrationError, TicketGenerator};
use crate::config::OllamaConfig;
use crate::domain::GeneratedContent;
use crate::prompt::{build_instruction, TicketKind};

const SERVICE: &str = "Ollama";

/// Entry of the `/api/tags` listing
#[derive(Debug, Deserialize)]
struct ModelEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    format: &'a serde_json::Value,
    options: ChatOptions,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Whether `requested` is served by one of `available`
///
/// Exact, case-sensitive match first. Failing that, any available model whose
/// name starts with `requested` minus its `:tag` suffix counts, so asking for
/// `gemma3:27b` is satisfied by `gemma3:latest`.
pub fn model_matches<'a>(requested: &str, available: &'a [String]) -> Option<&'a str> {
    if let Some(exact) = available.iter().find(|m| m.as_str() == requested) {
        return Some(exact.as_str());
    }

    let base = requested.split(':').next().unwrap_or(requested);
    available
        .iter()
        .find(|m| m.starts_with(base))
        .map(String::as_str)
}

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    host: String,
    model: String,
}

impl OllamaClient {
    /// Create a new client for `host` using `model` for every chat call
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(&config.host, &config.model)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the current model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Names of every model installed on the server
    pub async fn list_models(&self) -> Result<Vec<String>, IntegrationError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.host))
            .send()
            .await
            .map_err(|e| IntegrationError::unreachable(SERVICE, e))?;

        let response = check_status(SERVICE, response).await?;
        let status = response.status().as_u16();
        let list: ModelList = response.json().await.map_err(|e| IntegrationError::UpstreamError {
            service: SERVICE,
            status,
            message: format!("invalid model listing: {}", e),
        })?;

        Ok(list
            .models
            .into_iter()
            .map(|m| m.model.filter(|s| !s.is_empty()).unwrap_or(m.name))
            .collect())
    }

    /// Check whether `model` (or a tag-less match) is installed
    pub async fn is_model_available(&self, model: &str) -> Result<bool, IntegrationError> {
        let available = self.list_models().await?;

        match model_matches(model, &available) {
            Some(found) if found == model => Ok(true),
            Some(found) => {
                tracing::info!("Model {} not found, but {} is available", model, found);
                Ok(true)
            }
            None => {
                tracing::error!(
                    "Model {} not found. Available models: {:?}",
                    model,
                    available
                );
                Ok(false)
            }
        }
    }

    /// Send one chat message constrained to `schema` and return the raw content
    pub async fn chat_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, IntegrationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            format: schema,
            options: ChatOptions { temperature: 0.0 },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.host))
            .json(&request)
            .send()
            .await
            .map_err(|e| IntegrationError::unreachable(SERVICE, e))?;

        let response = check_status(SERVICE, response).await?;
        let status = response.status().as_u16();
        let chat: ChatResponse = response.json().await.map_err(|e| IntegrationError::UpstreamError {
            service: SERVICE,
            status,
            message: format!("invalid chat response: {}", e),
        })?;

        Ok(chat.message.content.trim().to_string())
    }
}

#[async_trait]
impl TicketGenerator for OllamaClient {
    async fn model_available(&self) -> Result<bool, IntegrationError> {
        self.is_model_available(&self.model).await
    }

    async fn generate_preview(
        &self,
        prompt: &str,
        user_story: bool,
    ) -> Result<GeneratedContent, IntegrationError> {
        if !self.is_model_available(&self.model).await? {
            return Err(IntegrationError::ModelUnavailable(self.model.clone()));
        }

        let instruction = build_instruction(TicketKind::from_flag(user_story), prompt);

        tracing::info!(
            "Calling Ollama with model {} for structured content generation...",
            self.model
        );
        let raw = self
            .chat_structured(&instruction, &GeneratedContent::json_schema())
            .await?;
        tracing::debug!("Ollama response: {}", raw);

        let content = GeneratedContent::from_model_output(&raw).map_err(|e| {
            tracing::error!("Failed to parse Ollama structured response: {}", e);
            IntegrationError::MalformedOutput(e.to_string())
        })?;

        tracing::info!(
            "Generated preview: summary='{}', description length={}",
            content.summary,
            content.description.len()
        );
        Ok(content)
    }
}
