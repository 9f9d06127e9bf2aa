//! HTTP API for aeolens
//!
//! `POST /analyze` runs a complete analysis and answers with the report JSON;
//! `GET /health` reports liveness. Failures keep the report's error shape
//! (`{success: false, error, blockDetection?}`) with a matching status code.

use std::future::Future;
use std::io;
use std::sync::Arc;

use aeolens_core::{AnalysisOutcome, ErrorKind, ErrorResult, Orchestrator, PageFetcher};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[cfg(test)]
mod tests;

/// Body of `POST /analyze`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default)]
    pub target_keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

/// Resolve when `signal` fires
///
/// If the signal listener cannot be installed the error is logged and the
/// future never resolves, so the server keeps running until killed.
pub async fn shutdown_on<S>(signal: S)
where
    S: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutting down"),
        Err(err) => {
            tracing::warn!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

/// Build the router around a shared orchestrator
pub fn router<F>(orchestrator: Arc<Orchestrator<F>>) -> Router
where
    F: PageFetcher + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze::<F>))
        .with_state(orchestrator)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn analyze<F>(
    State(orchestrator): State<Arc<Orchestrator<F>>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response
where
    F: PageFetcher + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            let error = ErrorResult {
                success: false,
                error: format!("Invalid request body: {}", rejection.body_text()),
                block_detection: None,
                kind: ErrorKind::Validation,
            };
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    tracing::info!(url = %request.url, keywords = request.target_keywords.len(), "analyze request");
    match orchestrator
        .run_complete_analysis(&request.url, &request.target_keywords)
        .await
    {
        AnalysisOutcome::Success(result) => (StatusCode::OK, Json(result)).into_response(),
        AnalysisOutcome::Failure(error) => (status_for(error.kind), Json(error)).into_response(),
    }
}

/// HTTP status for a failed analysis
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Blocked => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Fetch => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
