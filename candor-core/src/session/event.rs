//! Outbound session events
//!
//! Transport-neutral events emitted by the session. The gateway converts
//! them into wire messages; `Close` asks the gateway to shut the connection
//! after flushing.

use crate::model::{EvaluationReport, Recommendation};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Question generation has started
    Loading { message: String },

    /// Deliver the next question
    Question {
        question: String,
        /// 1-based, strictly increasing
        question_number: usize,
        total_questions: usize,
        question_id: String,
    },

    /// An answer was recorded
    Acknowledgment {
        message: String,
        question_number: usize,
        total_questions: usize,
        /// Percentage of questions answered
        progress: f64,
    },

    /// Final evaluation has started
    Evaluating { message: String },

    /// The consolidated evaluation report
    FinalReport { report: EvaluationReport },

    /// The interview is over
    End {
        message: String,
        score: Option<f64>,
        recommendation: Option<Recommendation>,
    },

    /// Error surfaced to the client; does not itself close the connection
    Error { message: String },

    /// Ask the gateway to close the connection after flushing
    Close,
}
