//! User skill profile entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One skill on a user's profile, refreshed after each completed interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub name: String,
    /// Latest assessed proficiency, taken from the interview's overall score
    pub proficiency: f64,
    pub last_assessed_at: DateTime<Utc>,
}

impl SkillEntry {
    pub fn new(name: impl Into<String>, proficiency: f64, assessed_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            proficiency,
            last_assessed_at: assessed_at,
        }
    }
}
