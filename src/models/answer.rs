use serde::{Deserialize, Serialize};

/// One answer option of a question. `id` is assigned by the question bank on
/// first save and stays `None` for options created client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default)]
    pub id: Option<i64>,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: None,
            text: text.into(),
            is_correct,
        }
    }

    /// Blank answers do not count toward a question being answerable.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
