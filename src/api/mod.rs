//! HTTP gateway for Ticketsmith

pub mod handlers;
mod routes;
mod state;
pub mod types;

pub use routes::build_router;
pub use state::AppState;
pub use types::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorDetail { detail })).into_response()
    }
}
