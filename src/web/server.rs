//! Axum web server for report compilation.
//!
//! Exposes the star's metadata listing and compiles report requests to SQL.
//! The SQL is returned to the caller; running it is the caller's business.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::binding::{bind_report, describe_star, BindingError, BindingOptions, ReportRequest, StarField};
use crate::loader::{LoadError, Schema, SchemaSource};

/// Application state shared across handlers
pub struct AppState {
    pub source: SchemaSource,
    pub options: BindingOptions,
}

type ApiError = (StatusCode, String);

/// Build the axum router with all routes
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/metadata", get(metadata))
        .route("/api/report", post(report))
        .layer(cors)
        .with_state(state)
}

/// Start the web server
pub async fn serve(
    schema: PathBuf,
    options: BindingOptions,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        source: SchemaSource::new(schema.clone()),
        options,
    });

    // Fail fast on a broken schema instead of on the first request.
    state.source.schema()?;

    let app = router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, schema = %schema.display(), "serving reports");

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// API Handlers
// ============================================================================

/// The schema can hit the disk, so it is fetched off the async workers.
async fn current_schema(state: &Arc<AppState>) -> Result<Arc<Schema>, ApiError> {
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || state.source.schema())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(load_error)
}

fn load_error(err: LoadError) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// GET /api/metadata - Dimensions and measures of the star.
async fn metadata(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StarField>>, ApiError> {
    let schema = current_schema(&state).await?;
    Ok(Json(describe_star(&schema.star)))
}

#[derive(Serialize)]
struct ReportResponse {
    /// `None` when the request selected nothing.
    sql: Option<String>,
}

/// POST /api/report - Compile a report request to SQL.
async fn report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    let schema = current_schema(&state).await?;

    let sql = bind_report(&schema.star, &req, state.options).map_err(|e| match e {
        BindingError::DimensionNotFound(_) | BindingError::MeasureNotFound(_) => {
            (StatusCode::NOT_FOUND, e.to_string())
        }
        BindingError::Report(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    Ok(Json(ReportResponse { sql }))
}
