//! InterviewAgent trait and a scripted test double
//!
//! The agent abstraction keeps the core independent of any particular
//! generative-language provider. The production implementation lives in
//! candor-agent; `ScriptedAgent` serves tests and the dev server.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::model::{AnswerRecord, EvaluationReport, InterviewConfig, QuestionRecord};

/// Structured operations against the generative-language service
#[async_trait]
pub trait InterviewAgent: Send + Sync {
    /// Generate the full question batch for an interview
    async fn generate_questions(
        &self,
        config: &InterviewConfig,
    ) -> Result<Vec<QuestionRecord>, AgentError>;

    /// Produce the consolidated evaluation for a finished interview
    async fn evaluate_interview(
        &self,
        config: &InterviewConfig,
        answers: &[AnswerRecord],
    ) -> Result<EvaluationReport, AgentError>;
}

/// Scripted agent returning queued responses in order
///
/// Each call pops the next queued result; an empty queue is an error so
/// tests fail loudly on unexpected extra calls.
#[derive(Default)]
pub struct ScriptedAgent {
    questions: Mutex<VecDeque<Result<Vec<QuestionRecord>, AgentError>>>,
    reports: Mutex<VecDeque<Result<EvaluationReport, AgentError>>>,
    generate_calls: AtomicUsize,
    evaluate_calls: AtomicUsize,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful question batch
    pub fn queue_questions(&self, questions: Vec<QuestionRecord>) {
        self.questions.lock().unwrap().push_back(Ok(questions));
    }

    /// Queue a generation failure
    pub fn queue_questions_error(&self, error: AgentError) {
        self.questions.lock().unwrap().push_back(Err(error));
    }

    /// Queue a successful evaluation report
    pub fn queue_report(&self, report: EvaluationReport) {
        self.reports.lock().unwrap().push_back(Ok(report));
    }

    /// Queue an evaluation failure
    pub fn queue_report_error(&self, error: AgentError) {
        self.reports.lock().unwrap().push_back(Err(error));
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn evaluate_calls(&self) -> usize {
        self.evaluate_calls.load(Ordering::SeqCst)
    }

    /// Build a batch of plain numbered questions
    pub fn numbered_questions(count: usize) -> Vec<QuestionRecord> {
        (0..count)
            .map(|index| QuestionRecord {
                id: format!("q-{}", index + 1),
                index,
                question: format!("Question {}", index + 1),
                focus: "general".to_string(),
                expected_depth: "intermediate".to_string(),
            })
            .collect()
    }
}

#[async_trait]
impl InterviewAgent for ScriptedAgent {
    async fn generate_questions(
        &self,
        _config: &InterviewConfig,
    ) -> Result<Vec<QuestionRecord>, AgentError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.questions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AgentError::Request(
                    "scripted agent has no queued question batch".to_string(),
                ))
            })
    }

    async fn evaluate_interview(
        &self,
        _config: &InterviewConfig,
        _answers: &[AnswerRecord],
    ) -> Result<EvaluationReport, AgentError> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        self.reports.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(AgentError::Request(
                "scripted agent has no queued report".to_string(),
            ))
        })
    }
}
