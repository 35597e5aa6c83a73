//! candor-server - WebSocket gateway for interview sessions
//!
//! Owns the shared application state (store, agent, admission gate, session
//! registry) and serves the interview protocol over a single authenticated
//! WebSocket endpoint.

pub mod auth;
mod config;
mod error;
mod http;
pub mod registry;
mod state;
pub mod ws;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use config::{AgentConfig, ServerConfig};
pub use error::ServerError;
pub use http::create_router;
pub use state::AppState;

/// The main candor server
pub struct CandorServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl CandorServer {
    /// Create a new server with production state
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(candor_core::MemoryStore::new());
        let state = Arc::new(AppState::from_config(&config, store));
        Self { config, state }
    }

    /// Create a server with custom state (for testing)
    pub fn with_state(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Run the server, binding to the configured address
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        tracing::info!("candor server listening on {}", addr);

        let router = create_router(self.state);
        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(())
    }
}
