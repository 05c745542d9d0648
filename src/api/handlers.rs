//! API request handlers
//!
//! Integration failures become `success: false` bodies with HTTP 200. The one
//! exception is a preview whose model output cannot be parsed, which is
//! reported as HTTP 500.

use axum::{extract::State, Json};

use crate::domain::NewIssue;
use crate::integrations::IntegrationError;

use super::state::AppState;
use super::types::*;
use super::AppError;

/// Report LLM server reachability and default model availability
///
/// Always answers 200; failures are described in the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ollama = &state.config.ollama;

    let response = match state.generator.model_available().await {
        Ok(model_available) => HealthResponse {
            status: HealthStatus::Healthy,
            ollama_host: ollama.host.clone(),
            default_model: ollama.model.clone(),
            model_available,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            HealthResponse {
                status: HealthStatus::Error,
                ollama_host: ollama.host.clone(),
                default_model: ollama.model.clone(),
                model_available: false,
                error: Some(e.to_string()),
            }
        }
    };

    Json(response)
}

/// Generate ticket content without creating the ticket
pub async fn preview_ticket(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    tracing::info!(
        "Generating preview for user: {}, project: {}",
        req.username,
        req.project_or(&state.config.jira.default_project)
    );

    match state
        .generator
        .generate_preview(&req.prompt, req.user_story)
        .await
    {
        Ok(content) => Ok(Json(PreviewResponse::ok(content))),
        // Kept as a 500 to match the existing client contract
        Err(e @ IntegrationError::MalformedOutput(_)) => Err(AppError::Internal(e.to_string())),
        Err(e) => {
            tracing::error!("Error generating preview: {}", e);
            Ok(Json(PreviewResponse::failed(e.to_string())))
        }
    }
}

/// Create a JIRA ticket from a (possibly edited) preview
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(req): Json<TicketRequest>,
) -> Json<TicketResponse> {
    let project = req
        .project_or(&state.config.jira.default_project)
        .to_string();

    tracing::info!(
        "Creating ticket for user: {}, project: {}, softpack_admin: {}, user_story: {}",
        req.username,
        project,
        req.softpack_admin,
        req.user_story
    );

    let issue = NewIssue {
        summary: req.summary,
        description: req.description,
        done: false,
        labels: Vec::new(),
        assignee: req.username.clone(),
        reporter: req.username,
        project_code: project,
        parent: None,
        softpack_admin: req.softpack_admin,
        user_story: req.user_story,
    };

    match state.tracker.create_issue(&issue).await {
        Ok(key) => {
            let url = state.tracker.browse_url(&key);
            tracing::info!("Created JIRA ticket: {}", url);
            Json(TicketResponse::created(key, url))
        }
        Err(e) => {
            tracing::error!("Error creating ticket: {}", e);
            Json(TicketResponse::failed(e.to_string()))
        }
    }
}
