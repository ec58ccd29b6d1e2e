use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::debug_handler;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde_json::{Value, json};
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use mealtrack_api::ProgressService;
use mealtrack_api::auth::AuthVerifier;
use mealtrack_api::error::ApiError;
use mealtrack_client::config::Config;
use mealtrack_client::http_client::ReqwestMealStoreClient;

struct AppState {
    service: ProgressService,
    verifier: AuthVerifier,
    metrics: PrometheusHandle,
}

#[debug_handler]
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state.metrics.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[debug_handler]
async fn today(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    metrics::counter!("progress_requests_total", "endpoint" => "today").increment(1);
    let user_id = authorize(&state, &headers)?;
    let date = match params.get("date") {
        Some(date) => date.clone(),
        None => chrono::Utc::now().format("%Y-%m-%d").to_string(),
    };
    let report = state.service.today(&user_id, &date).await?;
    Ok(Json(plan_envelope(report)?))
}

#[debug_handler]
async fn range(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    metrics::counter!("progress_requests_total", "endpoint" => "range").increment(1);
    let user_id = authorize(&state, &headers)?;
    let start = params
        .get("start")
        .ok_or_else(|| ApiError::Validation("missing query parameter: start".to_string()))?;
    let end = params
        .get("end")
        .ok_or_else(|| ApiError::Validation("missing query parameter: end".to_string()))?;
    let report = state.service.range(&user_id, start, end).await?;
    Ok(Json(plan_envelope(report)?))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());
    state.verifier.user_id_from_header(header)
}

/// Wrap a report in the `hasActivePlan` envelope the frontend consumes.
/// `None` (no active plan) is a 200 with an explanatory message, not an
/// error.
fn plan_envelope<T: serde::Serialize>(report: Option<T>) -> Result<Value, ApiError> {
    match report {
        Some(report) => {
            let mut body = serde_json::to_value(report)?;
            if let Some(obj) = body.as_object_mut() {
                obj.insert("hasActivePlan".to_string(), Value::Bool(true));
            }
            Ok(body)
        }
        None => Ok(json!({
            "hasActivePlan": false,
            "message": "No active nutrition plan found",
        })),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Logging from `MEALTRACK_LOG_LEVEL` (or `RUST_LOG`, default `info`).
    let log_env = std::env::var("MEALTRACK_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(log_env.clone())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!(%log_env, "mealtrack-server: log filter");

    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder()?;

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(%e, "missing meal store credentials; aborting startup");
            std::process::exit(1);
        }
    };
    let auth_secret = match std::env::var("MEALTRACK_AUTH_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ => {
            tracing::error!("MEALTRACK_AUTH_SECRET must be set; aborting startup");
            std::process::exit(1);
        }
    };

    let store = Arc::new(ReqwestMealStoreClient::from_config(&config));
    let state = Arc::new(AppState {
        service: ProgressService::new(store),
        verifier: AuthVerifier::new(&auth_secret),
        metrics: handle.clone(),
    });

    let request_timeout = std::env::var("REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30);

    let app = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/nutrition-progress/today", get(today))
        .route("/api/nutrition-progress/range", get(range))
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .with_state(state.clone());

    let addr: SocketAddr = std::env::var("ADDRESS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    info!(%addr, timeout_secs = request_timeout, "starting HTTP server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app.into_make_service());
    if let Err(e) = server
        .with_graceful_shutdown(async {
            signal::ctrl_c()
                .await
                .expect("failed to install ctrl+c handler");
        })
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
