use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::Question;

pub const SPLIT_COUNT_MIN: i32 = 1;
pub const SPLIT_COUNT_MAX: i32 = 2;
pub const ATTEMPT_LIMIT_MIN: i32 = 0;
pub const ATTEMPT_LIMIT_MAX: i32 = 2;

/// Test-wide settings. `attempt_limit` of 0 means unlimited attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSettings {
    #[serde(default)]
    pub randomize_order: bool,
    #[serde(default)]
    pub reveal_incorrect: bool,
    #[serde(default)]
    pub scored: bool,
    #[serde(default = "default_split_count")]
    pub split_count: i32,
    #[serde(default)]
    pub attempt_limit: i32,
}

fn default_split_count() -> i32 {
    SPLIT_COUNT_MIN
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            randomize_order: false,
            reveal_incorrect: false,
            scored: false,
            split_count: SPLIT_COUNT_MIN,
            attempt_limit: ATTEMPT_LIMIT_MIN,
        }
    }
}

/// A chapter's test as held by the question bank: ordered questions plus the
/// test-wide settings. `updated_at` is set by the bank on the canonical
/// document and is informational on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    #[serde(default)]
    pub settings: TestSettings,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl QuestionSet {
    pub fn empty() -> Self {
        Self {
            settings: TestSettings::default(),
            questions: Vec::new(),
            updated_at: None,
        }
    }
}
