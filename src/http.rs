//! HTTP transport for wellness-core
//!
//! Axum router exposing scoring, burnout detection and the orchestration
//! endpoints. Health, info and metrics are plain JSON.

use axum::{
    Json, Router,
    body::Body,
    extract::{MatchedPath, Path, State, rejection::JsonRejection},
    http::header,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::{cmp::Ordering, collections::HashMap, sync::Arc, time::Instant};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::assessment::{self, Assessment, Question, ScoreRequest};
use crate::burnout::{self, BurnoutRequest, BurnoutRisk};
use crate::config::Config;
use crate::error::{Result, WellnessError};
use crate::orchestration::{
    AssessmentProgramRequest, OrchestrationResponse, Orchestrator, Program, Quest,
    ReflectionQuestRequest, SupportChatRequest, SupportReply,
};

/// Latency samples kept for the p95 figure
const LATENCY_WINDOW: usize = 256;
/// Metrics key for `/api/` requests that matched no route
const UNMATCHED_ROUTE: &str = "unmatched";

/// Shared state for HTTP server
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Orchestrator,
    pub metrics: Arc<Mutex<HttpMetrics>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Arc<Config>, orchestrator: Orchestrator) -> Self {
        Self {
            config,
            orchestrator,
            metrics: Arc::new(Mutex::new(HttpMetrics::new())),
            started_at: Instant::now(),
        }
    }
}

/// Metrics for HTTP server
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub total_requests: u64,
    pub last_request_unix: u64,
    pub errors_total: u64,
    pub latencies: Vec<f64>, // ring buffer for p95
    /// Keyed by route template, never by raw path
    pub routes_count: HashMap<String, u64>,
}

impl HttpMetrics {
    fn new() -> Self {
        Self {
            total_requests: 0,
            last_request_unix: unix_now(),
            errors_total: 0,
            latencies: Vec::with_capacity(LATENCY_WINDOW),
            routes_count: HashMap::new(),
        }
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn json_body<T: DeserializeOwned>(
    payload: std::result::Result<Json<T>, JsonRejection>,
) -> Result<T> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| WellnessError::validation(rejection.body_text()))
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(state): State<AppState>) -> impl IntoResponse {
    let generation = &state.config.generation;
    let policy = state.orchestrator.policy();
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "generation": {
            "provider": generation.provider,
            "model": state.orchestrator.model(),
            "credentialsConfigured": state.config.runtime.gemini_api_key.is_some(),
            "maxAttempts": policy.max_attempts,
            "baseDelayMs": policy.base_delay.as_millis() as u64,
            "callTimeoutMs": policy.call_timeout.as_millis() as u64
        },
        "assessmentTools": [assessment::TEIQUE_SF],
        "server": {
            "bind": state.config.server.http_bind.to_string()
        }
    }))
}

/// Metrics endpoint
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let metrics = state.metrics.lock().await.clone();

    let (avg_latency_ms, p95_latency_ms) = if metrics.latencies.is_empty() {
        (None, None)
    } else {
        let sum: f64 = metrics.latencies.iter().sum();
        let avg = sum / metrics.latencies.len() as f64;
        let mut sorted = metrics.latencies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p95_idx = ((sorted.len() as f64 * 0.95) as usize).min(sorted.len() - 1);
        (Some(avg), sorted.get(p95_idx).copied())
    };

    let mut routes: Vec<_> = metrics.routes_count.iter().collect();
    routes.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let routes: Vec<_> = routes
        .into_iter()
        .map(|(k, v)| json!({ "route": k, "count": v }))
        .collect();

    Json(json!({
        "metricsVersion": "1",
        "totalRequests": metrics.total_requests,
        "lastRequestUnix": metrics.last_request_unix,
        "errorsTotal": metrics.errors_total,
        "avgLatencyMs": avg_latency_ms,
        "p95LatencyMs": p95_latency_ms,
        "routes": routes
    }))
}

/// `GET /api/assessments/:tool/questions`
pub async fn questions_handler(Path(tool): Path<String>) -> Result<Json<&'static [Question]>> {
    Ok(Json(assessment::questions_for_tool(&tool)?))
}

/// `POST /api/assessments/score`
pub async fn score_handler(
    payload: std::result::Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<Assessment>> {
    let request = json_body(payload)?;
    let scored = assessment::score_request(&request)?;
    tracing::info!(
        tool = %scored.tool,
        answers = request.answers.len(),
        baseline = scored.baseline_score,
        "assessment scored"
    );
    Ok(Json(scored))
}

/// `POST /api/burnout/risk`. Always answers 200 with a best-effort result.
pub async fn burnout_handler(
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Json<BurnoutRisk> {
    let request = payload
        .map_err(|rejection| rejection.body_text())
        .and_then(|Json(value)| {
            serde_json::from_value::<BurnoutRequest>(value).map_err(|e| e.to_string())
        });
    match request {
        Ok(request) => Json(burnout::assess_burnout(&request)),
        Err(e) => {
            tracing::warn!("burnout request unreadable, returning safe default: {}", e);
            Json(BurnoutRisk::safe_default())
        }
    }
}

/// `POST /api/quests/generate`
pub async fn quest_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ReflectionQuestRequest>, JsonRejection>,
) -> Result<Json<OrchestrationResponse<Quest>>> {
    let request = json_body(payload)?;
    Ok(Json(state.orchestrator.reflection_to_quest(&request).await?))
}

/// `POST /api/programs/generate`
pub async fn program_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AssessmentProgramRequest>, JsonRejection>,
) -> Result<Json<OrchestrationResponse<Program>>> {
    let request = json_body(payload)?;
    Ok(Json(state.orchestrator.assessment_to_program(&request).await?))
}

/// `POST /api/support/chat`
pub async fn support_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SupportChatRequest>, JsonRejection>,
) -> Result<Json<OrchestrationResponse<SupportReply>>> {
    let request = json_body(payload)?;
    Ok(Json(state.orchestrator.support_chat(&request).await?))
}

/// Build the application router with middleware
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.server.cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/assessments/:tool/questions", get(questions_handler))
        .route("/api/assessments/score", post(score_handler))
        .route("/api/burnout/risk", post(burnout_handler))
        .route("/api/quests/generate", post(quest_handler))
        .route("/api/programs/generate", post(program_handler))
        .route("/api/support/chat", post(support_handler))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            |State(metrics): State<Arc<Mutex<HttpMetrics>>>,
             req: axum::http::Request<Body>,
             next: axum::middleware::Next| async move {
                if !req.uri().path().starts_with("/api/") {
                    return next.run(req).await;
                }
                let route = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());
                let start_time = Instant::now();
                let resp = next.run(req).await;
                let latency_ms = start_time.elapsed().as_secs_f64() * 1000.0;
                let mut m = metrics.lock().await;
                m.latencies.push(latency_ms);
                if m.latencies.len() > LATENCY_WINDOW {
                    m.latencies.remove(0);
                }
                if !resp.status().is_success() {
                    m.errors_total = m.errors_total.saturating_add(1);
                }
                m.total_requests = m.total_requests.saturating_add(1);
                *m.routes_count.entry(route).or_insert(0) += 1;
                m.last_request_unix = unix_now();
                resp
            },
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(state: AppState) -> anyhow::Result<()> {
    let bind = state.config.server.http_bind;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener on {}: {}", bind, e))?;

    tracing::info!("Starting HTTP server on {}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
