//! Per-session proctoring log
//!
//! Ingests out-of-band violation events from external detectors during an
//! active session. No cooldown or deduplication happens here; that
//! responsibility lives in the detector collaborator. Every call stores an
//! entry.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::model::Violation;

const UNKNOWN_DETECTOR: &str = "unknown";

/// Ordered collection of violations for one session
#[derive(Debug, Default)]
pub struct ProctorLog {
    entries: Vec<Violation>,
}

impl ProctorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation tagged with the current question cursor
    ///
    /// Violations are silent by default: persisted for admin review, never
    /// surfaced to the interview UI in real time.
    pub fn record(
        &mut self,
        violation_type: &str,
        detector: Option<&str>,
        question_index: usize,
        metadata: Option<Value>,
    ) {
        let violation = Violation {
            violation_type: violation_type.to_string(),
            detector: detector.unwrap_or(UNKNOWN_DETECTOR).to_string(),
            at: Utc::now(),
            question_index,
            metadata: metadata.unwrap_or(Value::Null),
            silent: true,
        };
        debug!(
            violation_type,
            detector = %violation.detector,
            question_index,
            "recorded proctoring violation"
        );
        self.entries.push(violation);
    }

    /// Count of stored violations grouped by type, for diagnostic output
    pub fn summarize(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.violation_type.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn violations(&self) -> &[Violation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_stores_every_event_without_dedup() {
        let mut log = ProctorLog::new();
        log.record("no_face", Some("face-detector"), 0, None);
        log.record("no_face", Some("face-detector"), 0, None);
        log.record("multiple_faces", None, 1, Some(json!({"count": 2})));

        assert_eq!(log.len(), 3);
        assert_eq!(log.violations()[2].detector, "unknown");
        assert_eq!(log.violations()[2].question_index, 1);
    }

    #[test]
    fn violations_are_silent_by_default() {
        let mut log = ProctorLog::new();
        log.record("tab_switch", Some("focus-monitor"), 2, None);
        assert!(log.violations()[0].silent);
    }

    #[test]
    fn summarize_groups_by_type() {
        let mut log = ProctorLog::new();
        log.record("no_face", Some("face-detector"), 0, None);
        log.record("no_face", Some("face-detector"), 1, None);
        log.record("tab_switch", Some("focus-monitor"), 1, None);

        let summary = log.summarize();
        assert_eq!(summary.get("no_face"), Some(&2));
        assert_eq!(summary.get("tab_switch"), Some(&1));
    }
}
