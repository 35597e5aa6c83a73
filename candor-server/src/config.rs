//! Server configuration
//!
//! Loaded from a TOML file, with secrets overridable through the
//! environment so config files can be committed without keys.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ServerError;

/// Environment variable overriding the generative-language API key
const API_KEY_ENV: &str = "CANDOR_API_KEY";
/// Environment variable overriding the JWT signing secret
const JWT_SECRET_ENV: &str = "CANDOR_JWT_SECRET";

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Secret used to verify connection tokens
    pub jwt_secret: String,
    /// Generative-language provider settings
    pub agent: AgentConfig,
}

/// Generative-language provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model name passed to the provider
    pub model: String,
    /// API key; usually supplied via CANDOR_API_KEY
    pub api_key: String,
    /// Override the provider base URL (tests, proxies)
    pub base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7461,
            jwt_secret: String::new(),
            agent: AgentConfig::default(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            api_key: String::new(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("reading {}: {e}", path.display())))?;
        let mut config: ServerConfig = toml::from_str(&raw)
            .map_err(|e| ServerError::Config(format!("parsing {}: {e}", path.display())))?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.agent.api_key = key;
        }
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            self.jwt_secret = secret;
        }
    }

    /// Returns the socket address string (e.g., "0.0.0.0:7461")
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
