//! HTTP request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mintpass_types::{AuthMethod, Identity};
use serde::Deserialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::metrics::METRICS;
use crate::middleware::RequestId;
use crate::response::{HealthResponse, MintResponse, SessionResponse};
use crate::state::AppState;

/// Health check with RPC and session status.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rpc_status = state.rpc.health_check().await.unwrap_or("unavailable");
    let session_connected = state.session.lock().await.is_connected();

    let status = if rpc_status == "unavailable" {
        "unavailable"
    } else if rpc_status == "degraded" {
        "degraded"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status,
        network: state.config.network.clone(),
        sponsor_account: state.sponsor_account.clone(),
        pass_contract: state.config.pass_contract_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
        active_rpc: state.rpc.active_url().to_string(),
        failovers: state.rpc.failover_count(),
        rpc_status,
        session_connected,
    })
}

/// Prometheus metrics in text exposition format.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let connected = state.session.lock().await.is_connected();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        METRICS.render(connected),
    )
}

/// The balance-gated view model. `GET /session`
pub async fn session_view(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let session = state.session.lock().await;
    Json(SessionResponse::from_session(
        &session,
        &state.config.login_methods,
    ))
}

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub method: AuthMethod,
    pub name: String,
    pub token: String,
}

/// Establish an identity and run the pipeline. `POST /session/connect`
pub async fn connect(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConnectRequest>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    METRICS.connects_total.fetch_add(1, Ordering::Relaxed);

    if request.name.is_empty() || request.token.is_empty() {
        warn!("Connect rejected: empty name or token");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "name and token must be non-empty"
            })),
        )
            .into_response();
    }

    info!(method = %request.method, "Connect requested");
    let mut session = state.session.lock().await;
    session
        .connect(Identity {
            method: request.method,
            name: request.name,
            token: request.token,
        })
        .await;

    Json(SessionResponse::from_session(
        &session,
        &state.config.login_methods,
    ))
    .into_response()
}

/// Discard local session state. `POST /session/disconnect`
pub async fn disconnect(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    METRICS.disconnects_total.fetch_add(1, Ordering::Relaxed);

    let mut session = state.session.lock().await;
    session.disconnect();
    Json(SessionResponse::from_session(
        &session,
        &state.config.login_methods,
    ))
}

/// The remedial mint action. `POST /session/mint`
///
/// Write-path errors are not swallowed here: the outcome of the single
/// sponsored submission, success or failure, is what the caller sees.
pub async fn mint(
    State(state): State<Arc<AppState>>,
    request_parts: axum::extract::Request,
) -> (StatusCode, Json<MintResponse>) {
    let start = std::time::Instant::now();
    state.request_count.fetch_add(1, Ordering::Relaxed);
    METRICS.mint_total.fetch_add(1, Ordering::Relaxed);

    let req_id = request_parts
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    let mut session = state.session.lock().await;
    match session.execute_mint().await {
        Ok(outcome) => {
            METRICS.mint_success.fetch_add(1, Ordering::Relaxed);
            METRICS.record_mint_duration(start);
            info!(req_id = %req_id, reference = %outcome.reference, "Mint succeeded");
            (StatusCode::OK, Json(MintResponse::ok(outcome)))
        }
        Err(e) => {
            METRICS.mint_error.fetch_add(1, Ordering::Relaxed);
            METRICS.record_mint_duration(start);
            error!(req_id = %req_id, error = %e, "Mint failed");
            (e.status_code(), Json(MintResponse::err(e.to_string())))
        }
    }
}
