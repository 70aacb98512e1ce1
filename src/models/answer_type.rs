use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One entry of the answer-type catalog served by the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerType {
    pub id: i64,
    pub name: String,
}

/// Resolves which answer-type ids denote multi-selection questions.
///
/// The classification is data-driven: an id is multi-selection when its
/// lowercased display name belongs to the "multiple"/"checkbox" family.
/// Every other id, including ids missing from the catalog, is treated as
/// single-selection.
#[derive(Debug, Clone, Default)]
pub struct AnswerTypeCatalog {
    types: Vec<AnswerType>,
    multi_ids: HashSet<i64>,
}

impl AnswerTypeCatalog {
    pub fn from_types(types: Vec<AnswerType>) -> Self {
        let multi_ids = types
            .iter()
            .filter(|t| {
                let name = t.name.to_lowercase();
                name.contains("multiple") || name.contains("checkbox")
            })
            .map(|t| t.id)
            .collect();

        Self { types, multi_ids }
    }

    pub fn is_multi_selection(&self, answer_type_id: i64) -> bool {
        self.multi_ids.contains(&answer_type_id)
    }

    /// Type assigned to freshly created questions: the first single-selection
    /// entry, falling back to the first entry, then to id 1.
    pub fn default_type_id(&self) -> i64 {
        self.types
            .iter()
            .find(|t| !self.multi_ids.contains(&t.id))
            .or_else(|| self.types.first())
            .map(|t| t.id)
            .unwrap_or(1)
    }

    pub fn types(&self) -> &[AnswerType] {
        &self.types
    }
}
