//! Shared application state

use std::sync::Arc;

use chrono::{DateTime, Utc};

use candor_agent::{AdmissionGate, GeminiClient, InterviewAgentClient};
use candor_core::{InterviewAgent, InterviewStore};

use crate::ServerConfig;
use crate::auth::JwtAuthenticator;
use crate::registry::SessionRegistry;

/// State shared across all connections
pub struct AppState {
    pub store: Arc<dyn InterviewStore>,
    pub agent: Arc<dyn InterviewAgent>,
    pub authenticator: JwtAuthenticator,
    pub registry: SessionRegistry,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build production state from configuration
    ///
    /// The admission gate is created here, once, so every session shares
    /// the same upstream quota.
    pub fn from_config(config: &ServerConfig, store: Arc<dyn InterviewStore>) -> Self {
        let client = match &config.agent.base_url {
            Some(base) => {
                GeminiClient::with_base_url(base, &config.agent.model, &config.agent.api_key)
            }
            None => GeminiClient::new(&config.agent.model, &config.agent.api_key),
        };
        let agent = Arc::new(InterviewAgentClient::new(
            Arc::new(client),
            Arc::new(AdmissionGate::new()),
        ));
        Self::new(store, agent, JwtAuthenticator::new(&config.jwt_secret))
    }

    /// Build state from explicit parts (tests use doubles here)
    pub fn new(
        store: Arc<dyn InterviewStore>,
        agent: Arc<dyn InterviewAgent>,
        authenticator: JwtAuthenticator,
    ) -> Self {
        Self {
            store,
            agent,
            authenticator,
            registry: SessionRegistry::new(),
            started_at: Utc::now(),
        }
    }

    /// In-memory state for tests
    #[cfg(test)]
    pub fn for_tests(agent: Arc<dyn InterviewAgent>) -> (Self, Arc<candor_core::MemoryStore>) {
        let store = Arc::new(candor_core::MemoryStore::new());
        let state = Self::new(
            store.clone(),
            agent,
            JwtAuthenticator::new("test-secret"),
        );
        (state, store)
    }
}
