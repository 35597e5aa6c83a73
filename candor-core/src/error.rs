//! Error types for candor-core

use thiserror::Error;

/// Errors from constructing or validating domain objects
#[derive(Debug, Error)]
pub enum ModelError {
    /// Interview configuration failed validation
    #[error("invalid interview configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from the storage collaborator
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected or failed the operation
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors from the generative-language agent
///
/// Raised by `InterviewAgent` implementations (see candor-agent). A session
/// treats any of these as a generation/evaluation failure.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The request to the generative service could not be sent
    #[error("request failed: {0}")]
    Request(String),

    /// The generative service returned a non-success response
    #[error("generative api error: {0}")]
    Api(String),

    /// The response body could not be parsed into the expected shape
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// All retry attempts were exhausted
    #[error("model call failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

/// Errors raised while driving an interview session
#[derive(Debug, Error)]
pub enum SessionError {
    /// No interview record with the given id
    #[error("interview not found: {0}")]
    UnknownInterview(String),

    /// The interview belongs to a different caller
    #[error("interview {0} belongs to another user")]
    WrongOwner(String),

    /// The interview has already been completed
    #[error("interview {0} is already completed")]
    AlreadyCompleted(String),

    /// Agent failure during generation or evaluation
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// Storage failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_error_exhausted_displays_attempts() {
        let err = AgentError::Exhausted {
            attempts: 3,
            last: "timeout".to_string(),
        };
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn session_error_converts_from_agent_error() {
        let err: SessionError = AgentError::Request("boom".to_string()).into();
        assert!(matches!(err, SessionError::Agent(_)));
    }

    #[test]
    fn session_error_converts_from_storage_error() {
        let err: SessionError = StorageError::Backend("down".to_string()).into();
        assert!(matches!(err, SessionError::Storage(_)));
    }

    #[test]
    fn model_error_displays_reason() {
        let err = ModelError::InvalidConfig("maxQuestions must be at least 1".to_string());
        assert!(err.to_string().contains("maxQuestions"));
    }
}
