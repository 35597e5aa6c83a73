//! Interview domain types
//!
//! Wire names are camelCase to match the JSON exchanged with clients and
//! stored in interview records.

mod interview;
mod report;
mod skill;

pub use interview::{
    AnswerRecord, InterviewConfig, InterviewRecord, InterviewStatus, QuestionRecord, Violation,
};
pub use report::{AnswerEvaluation, EvaluationReport, Recommendation};
pub use skill::SkillEntry;
