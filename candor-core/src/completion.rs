//! End-of-session evaluation and persistence
//!
//! Orchestrates the completion steps once the question batch is exhausted:
//! evaluate, splice per-question results into the answer history, persist
//! the record, and refresh the user's skill profile. Each step is
//! independently failable; only the evaluation and record persistence are
//! fatal to the session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::agent::InterviewAgent;
use crate::error::SessionError;
use crate::model::{AnswerRecord, EvaluationReport, InterviewRecord, SkillEntry, Violation};
use crate::storage::InterviewStore;

/// Runs the completion steps for one finished interview
///
/// Each session constructs one when its question batch is exhausted.
pub struct CompletionService {
    agent: Arc<dyn InterviewAgent>,
    store: Arc<dyn InterviewStore>,
}

impl CompletionService {
    pub fn new(agent: Arc<dyn InterviewAgent>, store: Arc<dyn InterviewStore>) -> Self {
        Self { agent, store }
    }

    /// Run the full completion sequence for a finished interview
    ///
    /// On success the record is persisted as completed and the report is
    /// returned for delivery to the client. Skill-profile failures are
    /// logged and swallowed; they never fail the completion.
    pub async fn complete(
        &self,
        record: &mut InterviewRecord,
        mut answers: Vec<AnswerRecord>,
        violations: Vec<Violation>,
        started_at: DateTime<Utc>,
    ) -> Result<EvaluationReport, SessionError> {
        let report = self
            .agent
            .evaluate_interview(&record.config, &answers)
            .await?;

        splice_evaluations(&mut answers, &report);

        let now = Utc::now();
        let duration_minutes = (now - started_at).num_minutes().max(0);
        record.results = answers;
        record.violations = violations;
        record.mark_completed(report.clone(), now, duration_minutes);
        self.store.save_interview(record).await?;

        self.update_skills(&record.user_id, &report).await;

        debug!(
            interview_id = %record.id,
            duration_minutes,
            "interview completed and persisted"
        );
        Ok(report)
    }

    /// Best-effort skill profile refresh
    ///
    /// Every strength and improvement area is treated as a skill name. An
    /// existing skill (exact, case-insensitive name match) gets its
    /// proficiency overwritten with the interview's overall score; new
    /// names are appended.
    async fn update_skills(&self, user_id: &str, report: &EvaluationReport) {
        let Some(score) = report.overall_score else {
            warn!(user_id, "report has no overall score; skipping skill update");
            return;
        };

        let mut skills = match self.store.load_skills(user_id).await {
            Ok(skills) => skills,
            Err(e) => {
                warn!(user_id, error = %e, "failed to load skill profile");
                return;
            }
        };

        let now = Utc::now();
        for name in report
            .strengths
            .iter()
            .chain(report.areas_for_improvement.iter())
        {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            match skills.iter_mut().find(|s| s.name.eq_ignore_ascii_case(name)) {
                Some(existing) => {
                    existing.proficiency = score;
                    existing.last_assessed_at = now;
                }
                None => skills.push(SkillEntry::new(name, score, now)),
            }
        }

        if let Err(e) = self.store.save_skills(user_id, &skills).await {
            warn!(user_id, error = %e, "failed to save skill profile");
        }
    }
}

/// Splice per-question evaluation entries into answers by positional index
///
/// A report shorter than the history leaves trailing answers without an
/// evaluation; that mismatch is tolerated and logged.
fn splice_evaluations(answers: &mut [AnswerRecord], report: &EvaluationReport) {
    if report.question_evaluations.len() < answers.len() {
        warn!(
            evaluated = report.question_evaluations.len(),
            answered = answers.len(),
            "report covers fewer questions than were answered"
        );
    }
    for (answer, evaluation) in answers.iter_mut().zip(report.question_evaluations.iter()) {
        answer.evaluation = Some(evaluation.clone());
    }
}
