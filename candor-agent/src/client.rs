//! Generative-language HTTP client
//!
//! The provider contract is deliberately narrow: a prompt goes in, free-form
//! text comes out. Everything structured happens above this layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use candor_core::AgentError;

/// Default Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Narrow request/response contract with the generative-language service
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Send a prompt, return the raw model text
    async fn generate(&self, prompt: &str) -> Result<String, AgentError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateResponse {
    /// Concatenate all text parts of the first candidate
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        if candidate.content.parts.is_empty() {
            return None;
        }
        Some(
            candidate
                .content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect(),
        )
    }
}

/// Client for the Google Generative Language `generateContent` endpoint
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, model, api_key)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Api(format!(
                "generative api returned {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Request(e.to_string()))?;

        parsed.text().ok_or_else(|| {
            AgentError::MalformedResponse("response contains no candidates".to_string())
        })
    }
}
