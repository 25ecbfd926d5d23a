// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! HTTP API
//!
//! Ingress for producers (`/api/sensor` and its legacy aliases), the
//! operator command surface (actions, auto-dispatch, simulator control)
//! and read-only snapshots (zones, alerts, suggestions). CORS is left
//! wide open: the dashboard is served from a different origin.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::advisory::{derive_alerts, derive_suggestions};
use crate::dispatch::DispatchManager;
use crate::ingest::{IngestError, IngestGateway, RawReading};
use crate::simulator::{SimulatorError, SimulatorSupervisor};
use crate::zones::ZoneStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ZoneStore>,
    pub gateway: Arc<IngestGateway>,
    pub dispatch: Arc<DispatchManager>,
    pub simulator: Arc<SimulatorSupervisor>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("{0}")]
    BadRequest(String),
}

impl From<SimulatorError> for ApiError {
    fn from(err: SimulatorError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Ingest(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "ok": false, "error": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(alias = "actionType")]
    pub action_type: String,
    pub zone: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AutoDispatchRequest {
    pub zone: String,
}

/// Build the full API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // legacy producers still post to the old route names
        .route("/api/sensor", post(post_sensor))
        .route("/api/sensor-update", post(post_sensor))
        .route("/api/sensor-update-v1", post(post_sensor))
        .route("/api/action", post(post_action))
        .route("/api/dispatch", get(get_dispatch))
        .route("/api/dispatch/auto", post(post_dispatch_auto))
        .route("/api/dispatch/cancel", post(post_dispatch_cancel))
        .route("/api/sim/start", post(post_sim_start))
        .route("/api/sim/stop", post(post_sim_stop))
        .route("/api/zones", get(get_zones))
        .route("/api/alerts", get(get_alerts))
        .route("/api/suggestions", get(get_suggestions))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the API until shutdown (Ctrl+C or SIGTERM).
pub async fn run_http(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("failed to install signal handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn post_sensor(
    State(state): State<AppState>,
    Json(raw): Json<RawReading>,
) -> ApiResult<Json<serde_json::Value>> {
    let reading = state.gateway.ingest(raw)?;
    Ok(Json(json!({ "ok": true, "reading": reading })))
}

async fn post_action(
    State(state): State<AppState>,
    Json(req): Json<ActionRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.zone.trim().is_empty() {
        return Err(ApiError::BadRequest("missing or empty zone id".to_string()));
    }
    let action = state.dispatch.trigger(
        &req.action_type,
        &req.zone,
        req.note.as_deref().unwrap_or(""),
    );
    Ok(Json(json!({ "ok": true, "action": action })))
}

async fn get_dispatch(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "ok": true, "countdown": state.dispatch.status() }))
}

async fn post_dispatch_auto(
    State(state): State<AppState>,
    Json(req): Json<AutoDispatchRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.zone.trim().is_empty() {
        return Err(ApiError::BadRequest("missing or empty zone id".to_string()));
    }
    // a live countdown makes this a silent no-op, not an error
    let scheduled = state.dispatch.schedule(&req.zone);
    Ok(Json(json!({ "ok": true, "scheduled": scheduled })))
}

async fn post_dispatch_cancel(State(state): State<AppState>) -> impl IntoResponse {
    let cancelled = state.dispatch.cancel();
    Json(json!({ "ok": true, "cancelled": cancelled }))
}

async fn post_sim_start(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    state.simulator.start()?;
    Ok(Json(json!({ "ok": true, "started": true })))
}

async fn post_sim_stop(State(state): State<AppState>) -> impl IntoResponse {
    state.simulator.stop();
    Json(json!({ "ok": true, "stopped": true }))
}

async fn get_zones(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.snapshot())
}

async fn get_alerts(State(state): State<AppState>) -> impl IntoResponse {
    Json(derive_alerts(&state.store.snapshot()))
}

async fn get_suggestions(State(state): State<AppState>) -> impl IntoResponse {
    Json(derive_suggestions(&state.store.snapshot()))
}
