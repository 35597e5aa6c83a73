//! InterviewSession state machine
//!
//! The session front-loads all AI latency: the full question batch is
//! generated before the first question is sent, so the answer-processing
//! path never calls the model. The final evaluation is the only other
//! model call, made once the batch is exhausted.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::agent::InterviewAgent;
use crate::completion::CompletionService;
use crate::error::SessionError;
use crate::model::{AnswerRecord, InterviewRecord, InterviewStatus, QuestionRecord};
use crate::proctor::ProctorLog;
use crate::storage::InterviewStore;

use super::event::SessionEvent;

/// Minimum answer length after trimming, in characters
const MIN_ANSWER_CHARS: usize = 5;
/// Answer prefix length used for duplicate fingerprinting
const FINGERPRINT_PREFIX_CHARS: usize = 50;

const LOADING_MESSAGE: &str = "Preparing your interview questions...";
const EVALUATING_MESSAGE: &str = "All questions answered. Evaluating your interview...";
const END_MESSAGE: &str = "Interview complete. Thank you for your time!";

/// Lifecycle phase of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the start message
    Init,
    /// Generating the question batch
    GeneratingQuestions,
    /// Awaiting the next answer
    Ready,
    /// An answer is being processed
    ProcessingAnswer,
    /// Running the final evaluation
    Evaluating,
    /// Finished successfully
    Completed,
    /// Terminal failure
    Failed,
}

/// Per-connection interview state machine
///
/// Owned exclusively by the connection handler; all methods take `&mut
/// self` and one message is fully processed before the next is dispatched.
pub struct InterviewSession {
    user_id: String,
    phase: SessionPhase,
    record: Option<InterviewRecord>,
    questions: Vec<QuestionRecord>,
    /// Index of the next unanswered question
    cursor: usize,
    answers: Vec<AnswerRecord>,
    proctor: ProctorLog,
    ready: bool,
    is_processing: bool,
    /// Answers that arrived before the first question was ready (FIFO)
    pending_answers: VecDeque<String>,
    /// Fingerprints of answers already accepted, to absorb retransmission
    seen_fingerprints: HashSet<String>,
    started_at: Option<DateTime<Utc>>,
    outbound: mpsc::UnboundedSender<SessionEvent>,
    agent: Arc<dyn InterviewAgent>,
    store: Arc<dyn InterviewStore>,
}

impl InterviewSession {
    pub fn new(
        user_id: impl Into<String>,
        agent: Arc<dyn InterviewAgent>,
        store: Arc<dyn InterviewStore>,
        outbound: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            phase: SessionPhase::Init,
            record: None,
            questions: Vec::new(),
            cursor: 0,
            answers: Vec::new(),
            proctor: ProctorLog::new(),
            ready: false,
            is_processing: false,
            pending_answers: VecDeque::new(),
            seen_fingerprints: HashSet::new(),
            started_at: None,
            outbound,
            agent,
            store,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn proctor(&self) -> &ProctorLog {
        &self.proctor
    }

    /// Start the interview referenced by `interview_id`
    ///
    /// Authorization failures emit an error and request close without ever
    /// calling the agent. Generation happens in one batch; the record is
    /// marked in-progress only after the batch succeeds, so a generation
    /// failure leaves the start timestamp unset.
    pub async fn start(&mut self, interview_id: &str) {
        if self.phase != SessionPhase::Init {
            self.emit(SessionEvent::Error {
                message: "interview already started on this connection".to_string(),
            });
            return;
        }

        let record = match self.store.find_interview(interview_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.reject(SessionError::UnknownInterview(interview_id.to_string()));
                return;
            }
            Err(e) => {
                self.reject(SessionError::Storage(e));
                return;
            }
        };
        if record.user_id != self.user_id {
            warn!(
                interview_id,
                user_id = %self.user_id,
                "rejected start for interview owned by another user"
            );
            self.reject(SessionError::WrongOwner(interview_id.to_string()));
            return;
        }
        if record.status == InterviewStatus::Completed {
            self.reject(SessionError::AlreadyCompleted(interview_id.to_string()));
            return;
        }

        let config = record.config.clone();
        self.record = Some(record);
        self.phase = SessionPhase::GeneratingQuestions;
        self.emit(SessionEvent::Loading {
            message: LOADING_MESSAGE.to_string(),
        });
        let mut questions = match self.agent.generate_questions(&config).await {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                self.fail("model returned an empty question batch".to_string())
                    .await;
                return;
            }
            Err(e) => {
                self.fail(format!("question generation failed: {e}")).await;
                return;
            }
        };
        if questions.len() != config.max_questions {
            warn!(
                requested = config.max_questions,
                returned = questions.len(),
                "model returned a different question count than requested"
            );
        }
        // Never deliver more questions than the interview was configured for
        questions.truncate(config.max_questions);

        let now = Utc::now();
        self.started_at = Some(now);
        if let Some(record) = self.record.as_mut() {
            record.mark_in_progress(now);
        }
        if let Err(e) = self.persist_record().await {
            self.fail(format!("could not persist interview start: {e}"))
                .await;
            return;
        }

        info!(
            interview_id,
            questions = questions.len(),
            "interview started"
        );
        self.questions = questions;
        self.ready = true;
        self.phase = SessionPhase::Ready;
        self.send_question(0);

        // Drain answers that arrived while the batch was generating
        while let Some(text) = self.pending_answers.pop_front() {
            self.submit_answer(&text).await;
        }
    }

    /// Process one answer submission
    pub async fn submit_answer(&mut self, raw: &str) {
        if matches!(self.phase, SessionPhase::Completed | SessionPhase::Failed) {
            debug!("ignoring answer after session end");
            return;
        }
        if !self.ready {
            debug!("buffering answer received before first question");
            self.pending_answers.push_back(raw.to_string());
            return;
        }
        if self.is_processing {
            warn!(
                question = self.cursor + 1,
                "dropping answer received while another is being processed"
            );
            return;
        }

        let text = raw.trim();
        if text.chars().count() < MIN_ANSWER_CHARS {
            self.emit(SessionEvent::Error {
                message: "answer is too short, please elaborate".to_string(),
            });
            return;
        }
        if !self
            .seen_fingerprints
            .insert(answer_fingerprint(self.cursor, text))
        {
            debug!(
                question = self.cursor + 1,
                "ignoring duplicate answer submission"
            );
            return;
        }

        self.is_processing = true;
        self.phase = SessionPhase::ProcessingAnswer;

        let question = &self.questions[self.cursor];
        self.answers.push(AnswerRecord {
            question_index: self.cursor,
            question: question.question.clone(),
            answer: text.to_string(),
            submitted_at: Utc::now(),
            evaluation: None,
        });
        self.cursor += 1;

        let total = self.questions.len();
        if self.cursor < total {
            // Batch mode: no model call on this path
            self.emit(SessionEvent::Acknowledgment {
                message: format!("Answer {} recorded", self.cursor),
                question_number: self.cursor,
                total_questions: total,
                progress: self.cursor as f64 / total as f64 * 100.0,
            });
            self.send_question(self.cursor);
            self.phase = SessionPhase::Ready;
        } else {
            self.phase = SessionPhase::Evaluating;
            self.emit(SessionEvent::Evaluating {
                message: EVALUATING_MESSAGE.to_string(),
            });
            self.finish().await;
        }
        self.is_processing = false;
    }

    /// Record an out-of-band proctoring violation
    ///
    /// Always stored, always silent; no response is sent to the client.
    pub fn record_violation(
        &mut self,
        violation_type: &str,
        detector: Option<&str>,
        metadata: Option<serde_json::Value>,
    ) {
        self.proctor
            .record(violation_type, detector, self.cursor, metadata);
    }

    /// Run end-of-session evaluation and persistence
    async fn finish(&mut self) {
        let Some(started_at) = self.started_at else {
            self.fail("session has no start timestamp".to_string()).await;
            return;
        };
        let service = CompletionService::new(self.agent.clone(), self.store.clone());
        let answers = self.answers.clone();
        let violations = self.proctor.violations().to_vec();
        let Some(record) = self.record.as_mut() else {
            self.fail("session has no interview record".to_string()).await;
            return;
        };

        match service.complete(record, answers, violations, started_at).await {
            Ok(report) => {
                self.phase = SessionPhase::Completed;
                let score = report.overall_score;
                let recommendation = report.recommendation;
                self.emit(SessionEvent::FinalReport { report });
                self.emit(SessionEvent::End {
                    message: END_MESSAGE.to_string(),
                    score,
                    recommendation,
                });
                self.emit(SessionEvent::Close);
            }
            Err(e) => self.fail(format!("evaluation failed: {e}")).await,
        }
    }

    /// Terminal failure: persist partial state, notify, request close
    async fn fail(&mut self, message: String) {
        warn!(user_id = %self.user_id, %message, "interview session failed");
        self.phase = SessionPhase::Failed;
        if let Some(record) = self.record.as_mut() {
            record.results = self.answers.clone();
            record.violations = self.proctor.violations().to_vec();
            record.mark_failed(message.clone());
        }
        if let Err(e) = self.persist_record().await {
            warn!(error = %e, "could not persist failed interview");
        }
        self.emit(SessionEvent::Error { message });
        self.emit(SessionEvent::Close);
    }

    /// Authorization rejection: error out and close without touching state
    fn reject(&mut self, error: SessionError) {
        self.phase = SessionPhase::Failed;
        self.emit(SessionEvent::Error {
            message: error.to_string(),
        });
        self.emit(SessionEvent::Close);
    }

    fn send_question(&self, index: usize) {
        let question = &self.questions[index];
        self.emit(SessionEvent::Question {
            question: question.question.clone(),
            question_number: index + 1,
            total_questions: self.questions.len(),
            question_id: question.id.clone(),
        });
    }

    async fn persist_record(&mut self) -> Result<(), crate::error::StorageError> {
        match self.record.as_ref() {
            Some(record) => self.store.save_interview(record).await,
            None => Ok(()),
        }
    }

    /// Outbound send; a no-op once the receiver is gone
    fn emit(&self, event: SessionEvent) {
        let _ = self.outbound.send(event);
    }

    #[cfg(test)]
    fn set_processing(&mut self, processing: bool) {
        self.is_processing = processing;
    }
}

/// Duplicate-submission fingerprint: question cursor plus answer prefix
fn answer_fingerprint(cursor: usize, trimmed: &str) -> String {
    let prefix: String = trimmed.chars().take(FINGERPRINT_PREFIX_CHARS).collect();
    format!("{cursor}:{prefix}")
}
