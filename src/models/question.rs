use serde::{Deserialize, Serialize};

use super::answer::Answer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: Option<i64>,
    pub statement: String,
    pub answer_type_id: i64,
    #[serde(default = "default_weight")]
    pub weight: i32,
    #[serde(default)]
    pub answers: Vec<Answer>,
    /// Derived pointer into `answers` for single-selection questions, kept in
    /// sync by the reconciler. Not part of the wire format.
    #[serde(skip)]
    pub selected_index: Option<usize>,
}

fn default_weight() -> i32 {
    1
}

impl Question {
    pub fn new(statement: impl Into<String>, answer_type_id: i64) -> Self {
        Self {
            id: None,
            statement: statement.into(),
            answer_type_id,
            weight: default_weight(),
            answers: Vec::new(),
            selected_index: None,
        }
    }

    /// Weight as entered in a form field: truncated and floored at zero.
    pub fn coerce_weight(raw: f64) -> i32 {
        if raw.is_nan() {
            return 0;
        }
        raw.trunc().max(0.0) as i32
    }

    /// Duplicate for insertion next to the original. Identity is reset on the
    /// question and on every answer so the bank treats the copy as new.
    pub fn duplicated(&self) -> Self {
        let mut copy = self.clone();
        copy.id = None;
        for answer in &mut copy.answers {
            answer.id = None;
        }
        copy
    }
}
