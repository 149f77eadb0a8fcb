//! Webhook web server.
//!
//! Routes:
//! - `GET /healthz` liveness check
//! - `POST /tg/{customer,pro,dispatcher}` Telegram webhook deliveries
//! - `POST /setup?key=...` re-registers the three webhooks

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::types::Update;
use tokio::net::TcpListener;

use crate::core::config::{Config, SECRET_TOKEN_HEADER};
use crate::core::error::AppResult;
use crate::telegram::bot::BotRole;
use crate::telegram::webhooks::{setup_webhooks, WebhookHub};

/// Shared state for the web server.
#[derive(Clone)]
struct WebState {
    hub: Arc<WebhookHub>,
}

#[derive(Debug, Deserialize)]
struct SetupParams {
    #[serde(default)]
    key: String,
}

/// Builds the router. Split out from [`start_web_server`] so tests can drive it directly.
pub fn create_router(hub: Arc<WebhookHub>) -> Router {
    let state = WebState { hub };

    Router::new()
        .route("/healthz", get(health_handler))
        .route(BotRole::Customer.webhook_path(), post(customer_webhook))
        .route(BotRole::Pro.webhook_path(), post(pro_webhook))
        .route(BotRole::Dispatcher.webhook_path(), post(dispatcher_webhook))
        .route("/setup", post(setup_handler))
        .with_state(state)
}

/// Start the web server and serve until SIGINT/SIGTERM.
pub async fn start_web_server(hub: Arc<WebhookHub>) -> AppResult<()> {
    let config = hub.config();
    let addr = SocketAddr::new(config.bind_addr, config.port);
    let app = create_router(hub);

    log::info!("Starting web server on http://{}", addr);
    log::info!("  /healthz                       - Health check");
    log::info!("  /tg/customer|pro|dispatcher    - Telegram webhooks");
    log::info!("  /setup?key=...                 - Re-register webhooks");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    log::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

async fn customer_webhook(State(state): State<WebState>, headers: HeaderMap, body: Bytes) -> Response {
    handle_webhook(&state, BotRole::Customer, &headers, &body).await
}

async fn pro_webhook(State(state): State<WebState>, headers: HeaderMap, body: Bytes) -> Response {
    handle_webhook(&state, BotRole::Pro, &headers, &body).await
}

async fn dispatcher_webhook(State(state): State<WebState>, headers: HeaderMap, body: Bytes) -> Response {
    handle_webhook(&state, BotRole::Dispatcher, &headers, &body).await
}

async fn handle_webhook(state: &WebState, role: BotRole, headers: &HeaderMap, body: &[u8]) -> Response {
    if !secret_header_matches(state.hub.config(), headers) {
        log::warn!("{} webhook: rejected delivery with bad secret token", role);
        return (StatusCode::FORBIDDEN, Json(json!({"ok": false, "error": "bad secret token"}))).into_response();
    }

    let update: Update = match serde_json::from_slice(body) {
        Ok(update) => update,
        Err(e) => {
            log::warn!("{} webhook: body is not a Telegram update: {}", role, e);
            return (StatusCode::BAD_REQUEST, Json(json!({"ok": false, "error": "invalid update"}))).into_response();
        }
    };

    state.hub.dispatch(role, update).await;
    Json(json!({"ok": true})).into_response()
}

async fn setup_handler(State(state): State<WebState>, Query(params): Query<SetupParams>) -> Response {
    let config = state.hub.config();
    if let Some(secret) = config.webhook_secret() {
        if params.key != secret {
            log::warn!("/setup called with a wrong key");
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }
    }

    match setup_webhooks(&state.hub.deps().bots, config).await {
        Ok(()) => (StatusCode::OK, "webhooks set").into_response(),
        Err(e) => {
            log::error!("/setup failed: {}", e);
            (StatusCode::BAD_GATEWAY, format!("webhook setup failed: {}", e)).into_response()
        }
    }
}

/// No secret configured means every delivery is accepted
fn secret_header_matches(config: &Config, headers: &HeaderMap) -> bool {
    match config.webhook_secret() {
        None => true,
        Some(secret) => headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == secret),
    }
}
