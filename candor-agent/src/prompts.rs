//! Prompt construction for generation and evaluation calls

use candor_core::{AnswerRecord, InterviewConfig};

/// Single prompt requesting the full question batch as strict JSON
pub fn generation_prompt(config: &InterviewConfig) -> String {
    format!(
        "You are conducting a {focus} interview for a {role} position at {level} level.\n\
         Technologies in scope: {stack}.\n\n\
         Generate exactly {count} interview questions. Respond with a strict JSON object of \
         the shape:\n\
         {{\"questions\": [{{\"question\": \"...\", \"focus\": \"...\", \"expectedDepth\": \"...\"}}]}}\n\
         Do not include any text outside the JSON object.",
        focus = config.focus,
        role = config.role,
        level = config.experience_level,
        stack = if config.tech_stack.is_empty() {
            "general".to_string()
        } else {
            config.tech_stack.join(", ")
        },
        count = config.max_questions,
    )
}

/// Single prompt containing the full transcript, requesting the
/// eleven-field evaluation report as strict JSON
pub fn evaluation_prompt(config: &InterviewConfig, answers: &[AnswerRecord]) -> String {
    let mut transcript = String::new();
    for answer in answers {
        transcript.push_str(&format!(
            "Question {}: {}\nAnswer: {}\n\n",
            answer.question_index + 1,
            answer.question,
            answer.answer
        ));
    }

    format!(
        "You just conducted a {focus} interview for a {role} position at {level} level.\n\n\
         Transcript:\n{transcript}\
         Evaluate the candidate. Respond with a strict JSON object containing these fields:\n\
         overallScore, technicalScore, problemSolvingScore, communicationScore (numbers 0-10),\n\
         summary (string), strengths (string array), areasForImprovement (string array),\n\
         questionEvaluations (one object per question, in order, with confidence, clarity,\n\
         technicalUnderstanding, summary, score),\n\
         recommendation (one of \"Strong Hire\", \"Hire\", \"Maybe\", \"Pass\"),\n\
         recommendationReason (string), nextSteps (string).\n\
         Do not include any text outside the JSON object.",
        focus = config.focus,
        role = config.role,
        level = config.experience_level,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

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
    fn generation_prompt_names_role_and_count() {
        let prompt = generation_prompt(&config());
        assert!(prompt.contains("Backend Developer"));
        assert!(prompt.contains("Mid-level"));
        assert!(prompt.contains("exactly 3 interview questions"));
        assert!(prompt.contains("Rust, PostgreSQL"));
        assert!(prompt.contains(r#""expectedDepth""#));
    }

    #[test]
    fn generation_prompt_handles_empty_stack() {
        let config = InterviewConfig::new("SRE", "Senior", vec![], "technical", 2).unwrap();
        let prompt = generation_prompt(&config);
        assert!(prompt.contains("general"));
    }

    #[test]
    fn evaluation_prompt_embeds_full_transcript() {
        let answers = vec![
            AnswerRecord {
                question_index: 0,
                question: "What is ownership?".to_string(),
                answer: "Each value has a single owner.".to_string(),
                submitted_at: Utc::now(),
                evaluation: None,
            },
            AnswerRecord {
                question_index: 1,
                question: "Explain indexes.".to_string(),
                answer: "They trade write cost for read speed.".to_string(),
                submitted_at: Utc::now(),
                evaluation: None,
            },
        ];
        let prompt = evaluation_prompt(&config(), &answers);
        assert!(prompt.contains("Question 1: What is ownership?"));
        assert!(prompt.contains("Question 2: Explain indexes."));
        assert!(prompt.contains("They trade write cost for read speed."));
        assert!(prompt.contains("recommendationReason"));
        assert!(prompt.contains("questionEvaluations"));
    }
}
