//! InterviewAgent implementation over a GenerativeClient
//!
//! Every call passes through the admission gate and is retried with
//! exponential backoff. A JSON-format failure counts as an attempt failure;
//! the final failure surfaces as `AgentError::Exhausted` with no silent
//! fallback. Field-level problems in an otherwise-parsed response degrade
//! gracefully and are only logged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use candor_core::{
    AgentError, AnswerRecord, EvaluationReport, InterviewAgent, InterviewConfig, QuestionRecord,
    Recommendation,
};

use crate::admission::AdmissionGate;
use crate::client::GenerativeClient;
use crate::extract::extract_json;
use crate::prompts;

/// Maximum attempts per external call
pub const MAX_RETRIES: u32 = 3;
/// First backoff delay; doubles after each failed attempt
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Named fields the evaluation response is expected to carry
const EXPECTED_REPORT_FIELDS: [&str; 11] = [
    "overallScore",
    "technicalScore",
    "problemSolvingScore",
    "communicationScore",
    "summary",
    "strengths",
    "areasForImprovement",
    "questionEvaluations",
    "recommendation",
    "recommendationReason",
    "nextSteps",
];

/// Production `InterviewAgent`: prompt construction, admission gating,
/// retry, and response validation over a narrow text client.
pub struct InterviewAgentClient {
    client: Arc<dyn GenerativeClient>,
    gate: Arc<AdmissionGate>,
    backoff_base: Duration,
}

impl InterviewAgentClient {
    pub fn new(client: Arc<dyn GenerativeClient>, gate: Arc<AdmissionGate>) -> Self {
        Self {
            client,
            gate,
            backoff_base: BACKOFF_BASE,
        }
    }

    /// Override the backoff base (tests)
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    async fn call_with_retry<T>(
        &self,
        label: &'static str,
        prompt: &str,
        parse: impl Fn(Value) -> Result<T, AgentError>,
    ) -> Result<T, AgentError> {
        let mut last = String::new();
        for attempt in 1..=MAX_RETRIES {
            let outcome = {
                // Permit dropped on every exit path, including errors below
                let _permit = self.gate.acquire().await;
                self.client.generate(prompt).await
            };
            let parsed = outcome.and_then(|raw| {
                let extracted = extract_json(&raw)
                    .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;
                debug!(label, strategy = ?extracted.strategy, "parsed model response");
                parse(extracted.value)
            });
            match parsed {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(label, attempt, error = %e, "model call attempt failed");
                    last = e.to_string();
                    if attempt < MAX_RETRIES {
                        tokio::time::sleep(self.backoff_base * 2u32.pow(attempt - 1)).await;
                    }
                }
            }
        }
        Err(AgentError::Exhausted {
            attempts: MAX_RETRIES,
            last,
        })
    }
}

#[async_trait]
impl InterviewAgent for InterviewAgentClient {
    async fn generate_questions(
        &self,
        config: &InterviewConfig,
    ) -> Result<Vec<QuestionRecord>, AgentError> {
        let prompt = prompts::generation_prompt(config);
        let requested = config.max_questions;
        self.call_with_retry("generate_questions", &prompt, move |value| {
            parse_questions(value, requested)
        })
        .await
    }

    async fn evaluate_interview(
        &self,
        config: &InterviewConfig,
        answers: &[AnswerRecord],
    ) -> Result<EvaluationReport, AgentError> {
        let prompt = prompts::evaluation_prompt(config, answers);
        self.call_with_retry("evaluate_interview", &prompt, parse_report)
            .await
    }
}

#[derive(Deserialize)]
struct QuestionsWire {
    questions: Vec<QuestionWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionWire {
    question: String,
    #[serde(default = "default_focus")]
    focus: String,
    #[serde(default = "default_depth")]
    expected_depth: String,
}

fn default_focus() -> String {
    "general".to_string()
}

fn default_depth() -> String {
    "intermediate".to_string()
}

/// Validate the `{questions: [...]}` shape and build the batch
///
/// A count differing from the request is a soft warning, not an error; a
/// batch larger than the request is cut down to it.
fn parse_questions(value: Value, requested: usize) -> Result<Vec<QuestionRecord>, AgentError> {
    let mut wire: QuestionsWire = serde_json::from_value(value).map_err(|e| {
        AgentError::MalformedResponse(format!("expected {{\"questions\": [...]}}: {e}"))
    })?;
    if wire.questions.is_empty() {
        return Err(AgentError::MalformedResponse(
            "question list is empty".to_string(),
        ));
    }
    if wire.questions.len() != requested {
        warn!(
            requested,
            returned = wire.questions.len(),
            "model returned a different question count than requested"
        );
    }
    // A short batch is accepted; extra questions beyond the request are dropped
    wire.questions.truncate(requested);
    Ok(wire
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, q)| QuestionRecord {
            id: Uuid::new_v4().to_string(),
            index,
            question: q.question,
            focus: q.focus,
            expected_depth: q.expected_depth,
        })
        .collect())
}

/// Validate the evaluation response
///
/// Absent fields are logged and stay absent; they never abort the
/// evaluation and are never defaulted to zero. An unrecognizable
/// recommendation label is dropped rather than failing the whole report.
fn parse_report(mut value: Value) -> Result<EvaluationReport, AgentError> {
    let Some(object) = value.as_object_mut() else {
        return Err(AgentError::MalformedResponse(
            "evaluation response is not a JSON object".to_string(),
        ));
    };

    for field in EXPECTED_REPORT_FIELDS {
        if !object.contains_key(field) {
            warn!(field, "evaluation report is missing a field");
        }
    }

    if let Some(label) = object.get("recommendation").and_then(Value::as_str) {
        match Recommendation::parse(label) {
            Some(recommendation) => {
                object.insert(
                    "recommendation".to_string(),
                    serde_json::to_value(recommendation)
                        .map_err(|e| AgentError::MalformedResponse(e.to_string()))?,
                );
            }
            None => {
                warn!(label, "dropping unrecognized recommendation label");
                object.remove("recommendation");
            }
        }
    }

    serde_json::from_value(value)
        .map_err(|e| AgentError::MalformedResponse(format!("evaluation report: {e}")))
}
