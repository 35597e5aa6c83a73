//! WebSocket message protocol
//!
//! Client frames use snake_case type tags, server frames camelCase tags;
//! fields are camelCase in both directions. Both shapes are pinned by the
//! serde tests below, so a rename in the Rust types cannot silently change
//! the wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use candor_core::{EvaluationReport, Recommendation, SessionEvent};

/// Messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Begin an interview session
    Start { interview_id: String },
    /// Submit an answer to the current question
    Response { response: String },
    /// Report a proctoring violation
    ProctoringViolation {
        violation_type: String,
        #[serde(default)]
        detector_name: Option<String>,
        #[serde(default)]
        metadata: Option<Value>,
    },
}

/// Messages from server to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Loading {
        message: String,
    },
    Question {
        question: String,
        question_number: usize,
        total_questions: usize,
        question_id: String,
    },
    Acknowledgment {
        message: String,
        question_number: usize,
        total_questions: usize,
        progress: f64,
    },
    Evaluating {
        message: String,
    },
    FinalReport {
        report: EvaluationReport,
    },
    End {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        recommendation: Option<Recommendation>,
    },
    Error {
        message: String,
    },
}

/// Map a session event to its wire frame; `Close` carries no frame
pub fn session_event_to_message(event: SessionEvent) -> Option<ServerMessage> {
    match event {
        SessionEvent::Loading { message } => Some(ServerMessage::Loading { message }),
        SessionEvent::Question {
            question,
            question_number,
            total_questions,
            question_id,
        } => Some(ServerMessage::Question {
            question,
            question_number,
            total_questions,
            question_id,
        }),
        SessionEvent::Acknowledgment {
            message,
            question_number,
            total_questions,
            progress,
        } => Some(ServerMessage::Acknowledgment {
            message,
            question_number,
            total_questions,
            progress,
        }),
        SessionEvent::Evaluating { message } => Some(ServerMessage::Evaluating { message }),
        SessionEvent::FinalReport { report } => Some(ServerMessage::FinalReport { report }),
        SessionEvent::End {
            message,
            score,
            recommendation,
        } => Some(ServerMessage::End {
            message,
            score,
            recommendation,
        }),
        SessionEvent::Error { message } => Some(ServerMessage::Error { message }),
        SessionEvent::Close => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_start_uses_snake_case_tag_and_camel_case_fields() {
        let msg: ClientMessage =
            serde_json::from_value(json!({"type": "start", "interviewId": "iv-1"})).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Start {
                interview_id: "iv-1".to_string()
            }
        );
    }

    #[test]
    fn client_violation_allows_missing_optional_fields() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "proctoring_violation",
            "violationType": "tab_switch"
        }))
        .unwrap();
        match msg {
            ClientMessage::ProctoringViolation {
                violation_type,
                detector_name,
                metadata,
            } => {
                assert_eq!(violation_type, "tab_switch");
                assert!(detector_name.is_none());
                assert!(metadata.is_none());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn unknown_client_type_fails_to_parse() {
        let result: Result<ClientMessage, _> =
            serde_json::from_value(json!({"type": "reboot"}));
        assert!(result.is_err());
    }

    #[test]
    fn server_question_uses_camel_case_tag_and_fields() {
        let msg = ServerMessage::Question {
            question: "What is ownership?".to_string(),
            question_number: 1,
            total_questions: 5,
            question_id: "q-1".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "question");
        assert_eq!(value["questionNumber"], 1);
        assert_eq!(value["totalQuestions"], 5);
        assert_eq!(value["questionId"], "q-1");
    }

    #[test]
    fn server_final_report_tag_is_camel_case() {
        let msg = ServerMessage::FinalReport {
            report: EvaluationReport::default(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "finalReport");
    }

    #[test]
    fn server_end_omits_absent_score_and_recommendation() {
        let msg = ServerMessage::End {
            message: "Interview complete".to_string(),
            score: None,
            recommendation: None,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "end");
        assert!(value.get("score").is_none());
        assert!(value.get("recommendation").is_none());
    }

    #[test]
    fn close_event_produces_no_frame() {
        assert!(session_event_to_message(SessionEvent::Close).is_none());
        assert!(
            session_event_to_message(SessionEvent::Loading {
                message: "...".to_string()
            })
            .is_some()
        );
    }
}
