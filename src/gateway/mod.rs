//! HTTP gateway (Axum) for the match pipeline.
//!
//! This module is primarily used by the `endomatch` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use handler::match_handler;
pub use state::HandlerState;

use crate::audit::AuditClient;
use crate::trialstore::TrialStore;

/// Component status reported by `/ready`.
pub const STATUS_READY: &str = "ready";
/// Component status while a dependency is unreachable.
pub const STATUS_PENDING: &str = "pending";

pub fn create_router_with_state<S, C>(state: HandlerState<S, C>) -> Router
where
    S: TrialStore + 'static,
    C: AuditClient + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/match", post(match_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub trial_store: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<S, C>(State(state): State<HandlerState<S, C>>) -> Response
where
    S: TrialStore + 'static,
    C: AuditClient + 'static,
{
    let store_status = if state.pipeline.is_store_ready().await {
        STATUS_READY
    } else {
        STATUS_PENDING
    };

    let components = ComponentStatus {
        http: STATUS_READY,
        trial_store: store_status,
    };

    let is_ready = components.trial_store == STATUS_READY;
    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    (
        status_code,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
