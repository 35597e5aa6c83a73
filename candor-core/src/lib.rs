//! candor-core - domain model and session orchestration for candor
//!
//! This crate holds the interview domain types, the storage and agent
//! abstractions, the per-connection session state machine, the proctoring
//! log, and the end-of-interview completion service. Transport and
//! provider-specific code lives in candor-server and candor-agent.

pub mod agent;
pub mod completion;
pub mod error;
pub mod model;
pub mod proctor;
pub mod session;
pub mod storage;

pub use agent::{InterviewAgent, ScriptedAgent};
pub use completion::CompletionService;
pub use error::{AgentError, ModelError, SessionError, StorageError};
pub use model::{
    AnswerEvaluation, AnswerRecord, EvaluationReport, InterviewConfig, InterviewRecord,
    InterviewStatus, QuestionRecord, Recommendation, SkillEntry, Violation,
};
pub use proctor::ProctorLog;
pub use session::{InterviewSession, SessionEvent, SessionPhase};
pub use storage::{InterviewStore, MemoryStore};
