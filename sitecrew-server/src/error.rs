//! Error taxonomy shared by every request path, and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Extraction error: {0}")]
    Extraction(String),
    #[error("Generation failed: {0}")]
    Orchestrator(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SiteError {
    pub fn site_not_found(id: u64) -> Self {
        SiteError::NotFound(format!("Site {id}"))
    }

    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        SiteError::StorageUnavailable(format!("{context}: {err}"))
    }

    /// Malformed requests and unknown resources get an HTTP error status.
    /// Downstream failures are reported in-band with 200.
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SiteError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteError::StorageUnavailable(_)
            | SiteError::Extraction(_)
            | SiteError::Orchestrator(_) => StatusCode::OK,
        }
    }
}

/// Failure body: `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            SiteError::InvalidRequest(_) | SiteError::NotFound(_) => {
                tracing::debug!(error = %self, "Request rejected");
            }
            _ => tracing::error!(error = %self, "Request failed"),
        }
        let body = ErrorEnvelope {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
