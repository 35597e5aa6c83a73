//! HTTP router

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::AppState;
use crate::ws::ws_handler;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_sessions: usize,
    pub uptime_seconds: i64,
}

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        active_sessions: state.registry.len(),
        uptime_seconds: (chrono::Utc::now() - state.started_at).num_seconds(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use candor_core::ScriptedAgent;

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let (state, _store) = AppState::for_tests(Arc::new(ScriptedAgent::new()));
        let server = TestServer::new(create_router(Arc::new(state))).unwrap();

        let response = server.get("/api/health").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn ws_route_rejects_plain_http_requests() {
        let (state, _store) = AppState::for_tests(Arc::new(ScriptedAgent::new()));
        let server = TestServer::new(create_router(Arc::new(state))).unwrap();

        // Not a websocket upgrade, so the route must not answer 200
        let response = server.get("/ws").await;
        assert!(!response.status_code().is_success());
    }

    fn upgrade_server(state: Arc<AppState>) -> TestServer {
        TestServer::builder()
            .http_transport()
            .build(create_router(state))
            .unwrap()
    }

    #[tokio::test]
    async fn ws_upgrade_without_token_is_unauthorized() {
        let (state, _store) = AppState::for_tests(Arc::new(ScriptedAgent::new()));
        let server = upgrade_server(Arc::new(state));

        let response = server.get_websocket("/ws").await;
        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn ws_upgrade_with_bad_or_expired_token_is_unauthorized() {
        let (state, _store) = AppState::for_tests(Arc::new(ScriptedAgent::new()));
        let state = Arc::new(state);
        let server = upgrade_server(state.clone());

        let response = server.get_websocket("/ws?token=not-a-token").await;
        response.assert_status_unauthorized();

        let expired = state.authenticator.issue("user-1", -3600).unwrap();
        let response = server.get_websocket(&format!("/ws?token={expired}")).await;
        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn ws_upgrade_with_valid_token_switches_protocols() {
        let (state, _store) = AppState::for_tests(Arc::new(ScriptedAgent::new()));
        let state = Arc::new(state);
        let server = upgrade_server(state.clone());

        let token = state.authenticator.issue("user-1", 3600).unwrap();
        let response = server.get_websocket(&format!("/ws?token={token}")).await;
        response.assert_status(axum::http::StatusCode::SWITCHING_PROTOCOLS);
    }
}
