//! JSON extraction from free-form model output
//!
//! Models wrap JSON in code fences, preamble text, or trailing chatter. The
//! extractor is an ordered chain of parsing strategies returning a typed
//! result, so each link is independently testable: (1) the body of a code
//! fence, (2) the outermost object/array span, (3) the raw text. A format
//! failure here is an attempt failure for the retry policy; it is never
//! silently replaced with empty defaults.

use serde_json::Value;
use thiserror::Error;

/// Which strategy produced the parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    FencedBlock,
    DelimitedSpan,
    Raw,
}

/// A successful extraction
#[derive(Debug)]
pub struct Extracted {
    pub value: Value,
    pub strategy: Strategy,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no parseable JSON in model output: {0}")]
    Unparseable(String),
}

/// Run the strategy chain over raw model output
pub fn extract_json(raw: &str) -> Result<Extracted, ExtractError> {
    let trimmed = raw.trim();
    let mut last_reason: Option<String> = None;

    let fenced = strip_code_fence(trimmed);
    if let Some(inner) = fenced {
        match serde_json::from_str(inner.trim()) {
            Ok(value) => {
                return Ok(Extracted {
                    value,
                    strategy: Strategy::FencedBlock,
                });
            }
            Err(e) => last_reason = Some(e.to_string()),
        }
    }

    // Span-scan the fence body when there was one, otherwise the whole text
    let haystack = fenced.unwrap_or(trimmed);
    if let Some(span) = delimited_span(haystack) {
        match serde_json::from_str(span) {
            Ok(value) => {
                return Ok(Extracted {
                    value,
                    strategy: Strategy::DelimitedSpan,
                });
            }
            Err(e) => last_reason = Some(e.to_string()),
        }
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Extracted {
            value,
            strategy: Strategy::Raw,
        }),
        Err(e) => Err(ExtractError::Unparseable(
            last_reason.unwrap_or_else(|| e.to_string()),
        )),
    }
}

/// The body of the first ``` fence, if the text contains one
fn strip_code_fence(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // Skip a language tag like "json" on the fence line
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// The outermost `{...}` or `[...]` span, whichever opens first
fn delimited_span(text: &str) -> Option<&str> {
    let obj = text.find('{');
    let arr = text.find('[');
    let (open, close) = match (obj, arr) {
        (Some(o), Some(a)) if a < o => (a, ']'),
        (Some(o), _) => (o, '}'),
        (None, Some(a)) => (a, ']'),
        (None, None) => return None,
    };
    let end = text.rfind(close)?;
    if end <= open {
        return None;
    }
    Some(&text[open..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_raw_json() {
        let out = extract_json(r#"{"questions": []}"#).unwrap();
        assert_eq!(out.strategy, Strategy::DelimitedSpan);
        assert_eq!(out.value, json!({"questions": []}));
    }

    #[test]
    fn parses_fenced_json_block() {
        let raw = "Here you go:\n```json\n{\"overallScore\": 8}\n```\nHope that helps!";
        let out = extract_json(raw).unwrap();
        assert_eq!(out.strategy, Strategy::FencedBlock);
        assert_eq!(out.value, json!({"overallScore": 8}));
    }

    #[test]
    fn parses_fence_without_language_tag() {
        let raw = "```\n{\"a\": 1}\n```";
        let out = extract_json(raw).unwrap();
        assert_eq!(out.strategy, Strategy::FencedBlock);
        assert_eq!(out.value, json!({"a": 1}));
    }

    #[test]
    fn parses_object_embedded_in_prose() {
        let raw = "Sure! The result is {\"score\": 7, \"ok\": true} as requested.";
        let out = extract_json(raw).unwrap();
        assert_eq!(out.strategy, Strategy::DelimitedSpan);
        assert_eq!(out.value, json!({"score": 7, "ok": true}));
    }

    #[test]
    fn parses_array_embedded_in_prose() {
        let raw = "The list: [1, 2, 3] and nothing more.";
        let out = extract_json(raw).unwrap();
        assert_eq!(out.value, json!([1, 2, 3]));
    }

    #[test]
    fn prefers_object_when_it_opens_first() {
        let raw = r#"{"items": [1, 2]}"#;
        let out = extract_json(raw).unwrap();
        assert_eq!(out.value, json!({"items": [1, 2]}));
    }

    #[test]
    fn scalar_json_parses_via_raw_strategy() {
        let out = extract_json("42").unwrap();
        assert_eq!(out.strategy, Strategy::Raw);
        assert_eq!(out.value, json!(42));
    }

    #[test]
    fn garbage_is_an_error_not_a_default() {
        let result = extract_json("I am sorry, I cannot answer that.");
        assert!(matches!(result, Err(ExtractError::Unparseable(_))));
    }

    #[test]
    fn empty_output_is_an_error() {
        assert!(extract_json("   ").is_err());
    }

    #[test]
    fn fence_with_broken_json_falls_through_to_span_scan() {
        let raw = "```json\nnot json {\"a\": 1}\n```";
        let out = extract_json(raw).unwrap();
        assert_eq!(out.strategy, Strategy::DelimitedSpan);
        assert_eq!(out.value, json!({"a": 1}));
    }
}
