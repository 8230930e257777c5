//! Triage HTTP REST API
//!
//! Axum-based HTTP server exposing the intake and review workflows to
//! whatever front end is attached (the bundled CLI, or a dashboard).
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a
//! pure inner function. The inner functions take the store and recorder seams
//! directly, so they are testable against in-memory fakes without axum
//! dispatch machinery or a live database.
//!
//! Endpoints:
//! - GET  /health      — health check with DB status
//! - GET  /version     — server version info
//! - GET  /unanswered  — questions with no recorded answer
//! - POST /answers     — submit an answer for a question
//! - POST /knowledge   — manually add a Q&A pair
//! - GET  /queries     — recent user interactions

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use triage_core::error::TriageError;
use triage_core::store::{BoardStore, QueryLogStore};
use triage_core::TriageConfig;

use crate::workflows::knowledge::KnowledgeRecorder;
use crate::workflows::{intake, review};

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub pool: PgPool,
    pub board: Arc<dyn BoardStore>,
    pub recorder: Arc<KnowledgeRecorder>,
    pub query_log: Arc<dyn QueryLogStore>,
    pub config: TriageConfig,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/unanswered", get(unanswered_handler))
        .route("/answers", post(submit_answer_handler))
        .route("/knowledge", post(add_knowledge_handler))
        .route("/queries", get(queries_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<HttpState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Triage HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct AddKnowledgeRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct QueriesParams {
    pub limit: Option<usize>,
}

// ============================================================================
// Error mapping
// ============================================================================

/// Validation failures are the caller's fault; everything else is a failed
/// dependency surfaced as a server error.
fn error_status(e: &TriageError) -> StatusCode {
    match e {
        TriageError::EmptyAnswer | TriageError::EmptyQuestion => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(e: &TriageError) -> serde_json::Value {
    serde_json::json!({
        "error": e.to_string(),
        "status": "error",
    })
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner health check — queries DB and returns (status_code, json_body).
pub async fn health_inner(pool: &PgPool) -> (StatusCode, serde_json::Value) {
    let pg_ver = match triage_core::db::health_check(pool).await {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "status": "unhealthy",
                    "error": e.to_string(),
                }),
            );
        }
    };

    let pgvector_ver = match triage_core::db::check_pgvector(pool).await {
        Ok(v) => v,
        Err(e) => format!("unavailable: {}", e),
    };

    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "postgresql": pg_ver,
            "pgvector": pgvector_ver,
        }),
    )
}

/// Inner version — returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "triage",
    })
}

/// Inner unanswered list.
pub async fn unanswered_inner(board: &dyn BoardStore) -> (StatusCode, serde_json::Value) {
    match intake::list_unanswered(board).await {
        Ok(questions) => {
            let count = questions.len();
            (
                StatusCode::OK,
                serde_json::json!({
                    "questions": questions,
                    "count": count,
                }),
            )
        }
        Err(e) => (error_status(&e), error_body(&e)),
    }
}

/// Inner answer submission — records to the knowledge base, then merges into
/// the aggregate record.
pub async fn submit_answer_inner(
    board: &dyn BoardStore,
    recorder: &KnowledgeRecorder,
    req: SubmitAnswerRequest,
) -> (StatusCode, serde_json::Value) {
    match intake::submit_answer(board, recorder, &req.question, &req.answer).await {
        Ok(()) => (
            StatusCode::OK,
            serde_json::json!({
                "recorded": true,
                "question": req.question,
            }),
        ),
        Err(e) => (error_status(&e), error_body(&e)),
    }
}

/// Inner manual add — knowledge base only, aggregate record untouched.
pub async fn add_knowledge_inner(
    recorder: &KnowledgeRecorder,
    req: AddKnowledgeRequest,
) -> (StatusCode, serde_json::Value) {
    match recorder.add_manual(&req.question, &req.answer).await {
        Ok(id) => (
            StatusCode::OK,
            serde_json::json!({
                "recorded": true,
                "id": id,
            }),
        ),
        Err(e) => (error_status(&e), error_body(&e)),
    }
}

/// Inner recent queries.
pub async fn queries_inner(
    log: &dyn QueryLogStore,
    params: QueriesParams,
) -> (StatusCode, serde_json::Value) {
    match review::recent_queries(log, params.limit).await {
        Ok(records) => {
            let count = records.len();
            (
                StatusCode::OK,
                serde_json::json!({
                    "queries": records,
                    "count": count,
                }),
            )
        }
        Err(e) => (error_status(&e), error_body(&e)),
    }
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.pool).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn unanswered_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = unanswered_inner(state.board.as_ref()).await;
    (status, Json(body))
}

pub async fn submit_answer_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<SubmitAnswerRequest>,
) -> impl IntoResponse {
    let (status, body) = submit_answer_inner(state.board.as_ref(), &state.recorder, req).await;
    (status, Json(body))
}

pub async fn add_knowledge_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<AddKnowledgeRequest>,
) -> impl IntoResponse {
    let (status, body) = add_knowledge_inner(&state.recorder, req).await;
    (status, Json(body))
}

pub async fn queries_handler(
    State(state): State<Arc<HttpState>>,
    Query(params): Query<QueriesParams>,
) -> impl IntoResponse {
    let (status, body) = queries_inner(state.query_log.as_ref(), params).await;
    (status, Json(body))
}

// ============================================================================
// Unit Tests — call inner functions directly against in-memory fakes
// ============================================================================
