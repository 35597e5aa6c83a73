//! Interview configuration, questions, answers, and the persisted record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

use super::report::{AnswerEvaluation, EvaluationReport};

/// Immutable interview parameters, built from the persisted record at
/// session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewConfig {
    /// Target role, e.g. "Backend Developer"
    pub role: String,
    /// Experience level, e.g. "Mid-level"
    pub experience_level: String,
    /// Technologies the interview should cover
    pub tech_stack: Vec<String>,
    /// Focus type, e.g. "technical" or "behavioral"
    pub focus: String,
    /// Number of questions to generate
    pub max_questions: usize,
}

impl InterviewConfig {
    /// Build a validated configuration. `max_questions` must be at least 1.
    pub fn new(
        role: impl Into<String>,
        experience_level: impl Into<String>,
        tech_stack: Vec<String>,
        focus: impl Into<String>,
        max_questions: usize,
    ) -> Result<Self, ModelError> {
        if max_questions < 1 {
            return Err(ModelError::InvalidConfig(
                "maxQuestions must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            role: role.into(),
            experience_level: experience_level.into(),
            tech_stack,
            focus: focus.into(),
            max_questions,
        })
    }
}

/// One pre-generated interview question. Produced in a single batch at
/// session start and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// Stable identifier sent to the client alongside the question
    pub id: String,
    /// 0-based ordinal within the batch
    pub index: usize,
    pub question: String,
    /// Focus tag, e.g. "system design"
    pub focus: String,
    /// Expected answer depth, e.g. "intermediate"
    pub expected_depth: String,
}

/// One submitted answer, appended to the session's ordered history exactly
/// once per question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    /// 0-based index of the answered question
    pub question_index: usize,
    /// Snapshot of the question text at answer time
    pub question: String,
    pub answer: String,
    pub submitted_at: DateTime<Utc>,
    /// Spliced in from the final report at completion; absent until then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<AnswerEvaluation>,
}

/// A recorded proctoring anomaly. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub violation_type: String,
    pub detector: String,
    pub at: DateTime<Utc>,
    /// Question cursor at the time the violation was reported
    pub question_index: usize,
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Silent violations are never surfaced to the interview UI
    pub silent: bool,
}

/// Lifecycle status of a persisted interview record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// The persisted interview record. The session is the only writer of
/// `status`, `results`, and `final_report` during its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: String,
    pub user_id: String,
    pub config: InterviewConfig,
    pub status: InterviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub results: Vec<AnswerRecord>,
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_report: Option<EvaluationReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InterviewRecord {
    /// Create a fresh pending record
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, config: InterviewConfig) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            config,
            status: InterviewStatus::Pending,
            started_at: None,
            completed_at: None,
            duration_minutes: None,
            results: Vec::new(),
            violations: Vec::new(),
            final_report: None,
            error: None,
        }
    }

    /// Mark the interview in progress, recording the start timestamp
    pub fn mark_in_progress(&mut self, now: DateTime<Utc>) {
        self.status = InterviewStatus::InProgress;
        self.started_at = Some(now);
    }

    /// Mark the interview completed with the final report and duration
    pub fn mark_completed(
        &mut self,
        report: EvaluationReport,
        now: DateTime<Utc>,
        duration_minutes: i64,
    ) {
        self.status = InterviewStatus::Completed;
        self.completed_at = Some(now);
        self.duration_minutes = Some(duration_minutes);
        self.final_report = Some(report);
        self.error = None;
    }

    /// Mark the interview failed, keeping whatever partial history is set
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = InterviewStatus::Failed;
        self.error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> InterviewConfig {
        InterviewConfig::new(
            "Backend Developer",
            "Mid-level",
            vec!["Rust".to_string(), "PostgreSQL".to_string()],
            "technical",
            3,
        )
        .unwrap()
    }

    #[test]
    fn config_rejects_zero_questions() {
        let result = InterviewConfig::new("Backend Developer", "Mid-level", vec![], "technical", 0);
        assert!(matches!(result, Err(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn config_serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&config()).unwrap();
        assert!(json.contains(r#""experienceLevel""#));
        assert!(json.contains(r#""techStack""#));
        assert!(json.contains(r#""maxQuestions""#));
    }

    #[test]
    fn status_uses_snake_case_wire_names() {
        let json = serde_json::to_string(&InterviewStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);
    }

    #[test]
    fn new_record_is_pending_and_empty() {
        let record = InterviewRecord::new("int-1", "user-1", config());
        assert_eq!(record.status, InterviewStatus::Pending);
        assert!(record.results.is_empty());
        assert!(record.started_at.is_none());
        assert!(record.final_report.is_none());
    }

    #[test]
    fn mark_in_progress_records_start() {
        let mut record = InterviewRecord::new("int-1", "user-1", config());
        let now = Utc::now();
        record.mark_in_progress(now);
        assert_eq!(record.status, InterviewStatus::InProgress);
        assert_eq!(record.started_at, Some(now));
    }

    #[test]
    fn mark_failed_keeps_partial_results() {
        let mut record = InterviewRecord::new("int-1", "user-1", config());
        record.results.push(AnswerRecord {
            question_index: 0,
            question: "Q1".to_string(),
            answer: "partial answer".to_string(),
            submitted_at: Utc::now(),
            evaluation: None,
        });
        record.mark_failed("model unavailable");
        assert_eq!(record.status, InterviewStatus::Failed);
        assert_eq!(record.results.len(), 1);
        assert_eq!(record.error.as_deref(), Some("model unavailable"));
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = InterviewRecord::new("int-1", "user-1", config());
        let json = serde_json::to_string(&record).unwrap();
        let parsed: InterviewRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
