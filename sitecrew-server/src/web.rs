//! HTTP routes.
//!
//! JSON routes share one failure envelope (`SiteError` → `{success: false,
//! error}`); see `SiteError::status` for which failures get an error status.
//! `/health` is the exception: a storage failure there answers 503.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use sitecrew_agents::SiteBrief;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::{ErrorEnvelope, SiteError};
use crate::model::{Document, Site};
use crate::service::{Created, PREVIEW_MOUNT, SiteService};

const INDEX_PAGE: &str = include_str!("../templates/index.html");

/// Build the router. `static_dir`, when given, is served under `/static`.
pub fn router(service: Arc<SiteService>, static_dir: Option<&FsPath>) -> Router {
    let previews = ServeDir::new(service.artifacts().root());

    let mut app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/generate", post(generate))
        .route("/sites", get(list_sites))
        .route("/sites/{id}", get(get_site))
        .route("/sites/{id}/versions", post(create_version))
        .route("/preview/{name}", get(preview))
        .nest_service(PREVIEW_MOUNT, previews);

    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static assets from {}", dir.display());
            app = app.nest_service("/static", ServeDir::new(dir));
        } else {
            tracing::warn!("Static dir not found: {}", dir.display());
        }
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

// ── Response types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateResponse {
    success: bool,
    #[serde(flatten)]
    created: Created,
}

impl From<Created> for GenerateResponse {
    fn from(created: Created) -> Self {
        Self {
            success: true,
            created,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    sites: usize,
}

// ── Handlers ───────────────────────────────────────────────────────────

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Liveness: 503 when the metadata document cannot be loaded.
async fn health(State(service): State<Arc<SiteService>>) -> Response {
    match service.list_sites().await {
        Ok(doc) => Json(HealthResponse {
            status: "ok",
            sites: doc.sites.len(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            let body = ErrorEnvelope {
                success: false,
                error: e.to_string(),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

async fn generate(
    State(service): State<Arc<SiteService>>,
    form: Result<Form<SiteBrief>, FormRejection>,
) -> Result<Json<GenerateResponse>, SiteError> {
    let Form(brief) = form.map_err(|e| SiteError::InvalidRequest(e.body_text()))?;
    let created = service.create_site(brief).await?;
    Ok(Json(created.into()))
}

async fn list_sites(State(service): State<Arc<SiteService>>) -> Result<Json<Document>, SiteError> {
    Ok(Json(service.list_sites().await?))
}

async fn get_site(
    State(service): State<Arc<SiteService>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Site>, SiteError> {
    let Path(id) = id.map_err(|e| SiteError::InvalidRequest(e.body_text()))?;
    Ok(Json(service.get_site(id).await?))
}

async fn create_version(
    State(service): State<Arc<SiteService>>,
    id: Result<Path<u64>, PathRejection>,
    form: Result<Form<SiteBrief>, FormRejection>,
) -> Result<Json<GenerateResponse>, SiteError> {
    let Path(id) = id.map_err(|e| SiteError::InvalidRequest(e.body_text()))?;
    let Form(brief) = form.map_err(|e| SiteError::InvalidRequest(e.body_text()))?;
    let created = service.create_version(id, brief).await?;
    Ok(Json(created.into()))
}

async fn preview(
    State(service): State<Arc<SiteService>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, SiteError> {
    let body = service.preview(&name).await?;
    Ok(Html(body))
}
