//! Ticket request records and LLM-generated content

use serde::{Deserialize, Serialize};

/// Summary/description pair produced by the LLM
///
/// This is also the structured-output contract: [`GeneratedContent::json_schema`]
/// is sent with every chat request and the reply must deserialize into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub summary: String,
    pub description: String,
}

impl GeneratedContent {
    /// JSON schema the LLM output is constrained to
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "title": "JiraTicketContent",
            "type": "object",
            "properties": {
                "summary": { "title": "Summary", "type": "string" },
                "description": { "title": "Description", "type": "string" }
            },
            "required": ["summary", "description"]
        })
    }

    /// Parse model output against the schema
    pub fn from_model_output(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw.trim())
    }
}

/// Body of `POST /preview-ticket`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub username: String,
    #[serde(default)]
    pub project: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub softpack_admin: bool,
    #[serde(default)]
    pub user_story: bool,
}

impl PreviewRequest {
    pub fn project_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.project.as_deref().unwrap_or(default)
    }
}

/// Body of `POST /create-ticket`; summary and description may have been
/// edited by the user after the preview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    pub username: String,
    #[serde(default)]
    pub project: Option<String>,
    pub summary: String,
    pub description: String,
    #[serde(default)]
    pub softpack_admin: bool,
    #[serde(default)]
    pub user_story: bool,
}

impl TicketRequest {
    pub fn project_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.project.as_deref().unwrap_or(default)
    }
}
