//! Final evaluation report types
//!
//! The report is produced once, at session completion, from the model's
//! evaluation response. Callers must tolerate partially populated reports:
//! every scalar field is optional and list fields default to empty. Missing
//! fields stay absent; they are never defaulted to zero.

use serde::{Deserialize, Serialize};

/// Hiring recommendation returned by the evaluation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Hire", alias = "strong hire", alias = "strong_hire")]
    StrongHire,
    #[serde(alias = "hire")]
    Hire,
    #[serde(alias = "maybe")]
    Maybe,
    #[serde(alias = "pass")]
    Pass,
}

impl Recommendation {
    /// Parse a free-form recommendation label, tolerating case and
    /// underscore/space variations.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().replace('_', " ").as_str() {
            "strong hire" | "stronghire" => Some(Self::StrongHire),
            "hire" => Some(Self::Hire),
            "maybe" => Some(Self::Maybe),
            "pass" => Some(Self::Pass),
            _ => None,
        }
    }
}

/// Per-question evaluation sub-fields, spliced into the matching
/// `AnswerRecord` by positional index at completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_understanding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Consolidated evaluation of a full interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_solving_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    #[serde(default)]
    pub question_evaluations: Vec<AnswerEvaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_serializes_with_display_labels() {
        let json = serde_json::to_string(&Recommendation::StrongHire).unwrap();
        assert_eq!(json, r#""Strong Hire""#);
        let json = serde_json::to_string(&Recommendation::Hire).unwrap();
        assert_eq!(json, r#""Hire""#);
    }

    #[test]
    fn recommendation_parse_tolerates_casing() {
        assert_eq!(
            Recommendation::parse("STRONG HIRE"),
            Some(Recommendation::StrongHire)
        );
        assert_eq!(
            Recommendation::parse("strong_hire"),
            Some(Recommendation::StrongHire)
        );
        assert_eq!(Recommendation::parse(" pass "), Some(Recommendation::Pass));
        assert_eq!(Recommendation::parse("no hire"), None);
    }

    #[test]
    fn report_parses_with_all_fields_missing() {
        let report: EvaluationReport = serde_json::from_str("{}").unwrap();
        assert!(report.overall_score.is_none());
        assert!(report.communication_score.is_none());
        assert!(report.strengths.is_empty());
        assert!(report.question_evaluations.is_empty());
        assert!(report.recommendation.is_none());
    }

    #[test]
    fn report_missing_score_stays_absent_on_the_wire() {
        let report = EvaluationReport {
            overall_score: Some(8.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""overallScore":8.0"#));
        // absent, not zero
        assert!(!json.contains("communicationScore"));
    }

    #[test]
    fn report_parses_partial_json() {
        let json = r#"{
            "overallScore": 7.5,
            "technicalScore": 8,
            "strengths": ["Rust", "API design"],
            "recommendation": "Hire",
            "questionEvaluations": [{"score": 7, "summary": "solid"}]
        }"#;
        let report: EvaluationReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.overall_score, Some(7.5));
        assert_eq!(report.recommendation, Some(Recommendation::Hire));
        assert_eq!(report.strengths.len(), 2);
        assert_eq!(report.question_evaluations.len(), 1);
        assert_eq!(report.question_evaluations[0].score, Some(7.0));
        assert!(report.communication_score.is_none());
    }
}
