//! HTTP API over an [`AccessEngine`]
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check with snapshot sizes
//! - `GET /v1/users/:user/applications/:app/path` - Access path
//! - `GET /v1/users/:user/graph?max_depth=N` - Access graph
//! - `GET /v1/users/:user/chains` - Chains for every reachable application
//! - `GET /v1/users/:user/stats` - Path complexity statistics
//! - `GET /v1/users/:user/groups/:group/explanation` - Membership explanation
//! - `GET /v1/applications/:app/chains` - Chains for every user reaching an app
//! - `GET /v1/rules/statistics` - Rule inventory statistics
//! - `GET /v1/rules/:rule/users` - Users matching a rule
//! - `POST /v1/rules/evaluate` - Evaluate an expression against a profile
//! - `POST /v1/rules/render` - Render an expression as text

use crate::aggregate::{ChainBatch, ComplexityStats, RuleStatistics};
use crate::engine::AccessEngine;
use crate::error::ChainError;
use crate::graph::GraphData;
use crate::paths::{AccessChain, AccessPathNode};
use crate::rules::{render_rule, RuleEvaluator, RuleOutcome};
use accesstrace_core::{User, UserProfile};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<AccessEngine>,
    start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<AccessEngine>) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg,
            ),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        match err {
            e if e.is_not_found() => AppError::NotFound(e.to_string()),
            e @ ChainError::InvalidInput(_) => AppError::BadRequest(e.to_string()),
            e => AppError::Internal(e.to_string()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    uptime_seconds: u64,
    version: String,
    users: usize,
    groups: usize,
    applications: usize,
    rules: usize,
}

#[derive(Debug, Deserialize)]
struct GraphQuery {
    max_depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EvaluateRequest {
    expression: String,
    profile: UserProfile,
}

#[derive(Debug, Serialize)]
struct EvaluateResponse {
    matched: bool,
    outcome: RuleOutcome,
}

#[derive(Debug, Deserialize)]
struct RenderRequest {
    expression: String,
}

#[derive(Debug, Serialize)]
struct RenderResponse {
    text: String,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.engine.index();

    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version: crate::VERSION.to_string(),
        users: snapshot.users().len(),
        groups: snapshot.groups().len(),
        applications: snapshot.applications().len(),
        rules: snapshot.rules().len(),
    })
}

/// GET /v1/users/:user/applications/:app/path
async fn access_path(
    State(state): State<AppState>,
    Path((user_id, application_id)): Path<(String, String)>,
) -> Result<Json<AccessChain>, AppError> {
    debug!("Access path request: {} -> {}", user_id, application_id);
    Ok(Json(state.engine.resolve_access_path(&user_id, &application_id)?))
}

/// GET /v1/users/:user/graph
async fn access_graph(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<GraphData>, AppError> {
    if query.max_depth == Some(0) {
        return Err(AppError::BadRequest(
            "max_depth must be at least 1".to_string(),
        ));
    }
    Ok(Json(state.engine.build_access_graph(&user_id, query.max_depth)?))
}

/// GET /v1/users/:user/chains
async fn user_chains(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ChainBatch>, AppError> {
    Ok(Json(state.engine.chains_for_user(&user_id)?))
}

/// GET /v1/users/:user/stats
async fn user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ComplexityStats>, AppError> {
    Ok(Json(state.engine.complexity_stats(&user_id)?))
}

/// GET /v1/users/:user/groups/:group/explanation
async fn group_explanation(
    State(state): State<AppState>,
    Path((user_id, group_id)): Path<(String, String)>,
) -> Result<Json<Vec<AccessPathNode>>, AppError> {
    Ok(Json(
        state.engine.explain_group_membership(&user_id, &group_id)?,
    ))
}

/// GET /v1/applications/:app/chains
async fn application_chains(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<Json<ChainBatch>, AppError> {
    Ok(Json(state.engine.chains_for_application(&application_id)?))
}

/// GET /v1/rules/statistics
async fn rule_statistics(State(state): State<AppState>) -> Json<RuleStatistics> {
    Json(state.engine.rule_statistics())
}

/// GET /v1/rules/:rule/users
async fn rule_users(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.engine.users_matching_rule(&rule_id)?))
}

/// POST /v1/rules/evaluate
async fn evaluate_expression(
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    if req.expression.trim().is_empty() {
        return Err(AppError::BadRequest("expression is empty".to_string()));
    }

    let outcome = RuleEvaluator::new().evaluate(&req.expression, &req.profile);
    Ok(Json(EvaluateResponse {
        matched: outcome.is_match(),
        outcome,
    }))
}

/// POST /v1/rules/render
async fn render_expression(Json(req): Json<RenderRequest>) -> Json<RenderResponse> {
    Json(RenderResponse {
        text: render_rule(&req.expression),
    })
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/v1/users/:user/applications/:app/path",
            get(access_path),
        )
        .route("/v1/users/:user/graph", get(access_graph))
        .route("/v1/users/:user/chains", get(user_chains))
        .route("/v1/users/:user/stats", get(user_stats))
        .route(
            "/v1/users/:user/groups/:group/explanation",
            get(group_explanation),
        )
        .route("/v1/applications/:app/chains", get(application_chains))
        .route("/v1/rules/statistics", get(rule_statistics))
        .route("/v1/rules/:rule/users", get(rule_users))
        .route("/v1/rules/evaluate", post(evaluate_expression))
        .route("/v1/rules/render", post(render_expression))
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}
