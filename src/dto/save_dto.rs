use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question_set::{
    QuestionSet, ATTEMPT_LIMIT_MAX, ATTEMPT_LIMIT_MIN, SPLIT_COUNT_MAX, SPLIT_COUNT_MIN,
};

/// Full-replace save payload for a chapter's question set.
///
/// Order is carried as an explicit 1-based `order` field on every question
/// and answer; at build time it always equals array position + 1. The bank
/// upserts or deletes rows based on which ids are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveTestPayload {
    #[validate(nested)]
    pub settings: SaveSettingsPayload,
    #[validate(nested)]
    pub questions: Vec<SaveQuestionPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsPayload {
    pub randomize_order: bool,
    pub reveal_incorrect: bool,
    pub scored: bool,
    #[validate(range(min = 1, max = 2))]
    pub split_count: i32,
    #[validate(range(min = 0, max = 2))]
    pub attempt_limit: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuestionPayload {
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "Question statement cannot be empty"))]
    pub statement: String,
    pub answer_type_id: i64,
    #[validate(range(min = 0))]
    pub weight: i32,
    #[validate(range(min = 1))]
    pub order: i32,
    #[validate(nested)]
    pub answers: Vec<SaveAnswerPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnswerPayload {
    pub id: Option<i64>,
    pub text: String,
    pub is_correct: bool,
    #[validate(range(min = 1))]
    pub order: i32,
}

impl SaveTestPayload {
    pub fn from_document(document: &QuestionSet) -> Self {
        let settings = &document.settings;
        Self {
            settings: SaveSettingsPayload {
                randomize_order: settings.randomize_order,
                reveal_incorrect: settings.reveal_incorrect,
                scored: settings.scored,
                split_count: settings.split_count.clamp(SPLIT_COUNT_MIN, SPLIT_COUNT_MAX),
                attempt_limit: settings
                    .attempt_limit
                    .clamp(ATTEMPT_LIMIT_MIN, ATTEMPT_LIMIT_MAX),
            },
            questions: document
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| SaveQuestionPayload {
                    id: q.id,
                    statement: q.statement.clone(),
                    answer_type_id: q.answer_type_id,
                    weight: q.weight,
                    order: (i as i32) + 1,
                    answers: q
                        .answers
                        .iter()
                        .enumerate()
                        .map(|(j, a)| SaveAnswerPayload {
                            id: a.id,
                            text: a.text.clone(),
                            is_correct: a.is_correct,
                            order: (j as i32) + 1,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer::Answer;
    use crate::models::question::Question;
    use crate::models::question_set::TestSettings;

    fn document() -> QuestionSet {
        let mut q1 = Question::new("First", 1);
        q1.id = Some(10);
        q1.answers = vec![Answer::new("a", true), Answer::new("b", false)];
        let mut q2 = Question::new("Second", 2);
        q2.answers = vec![
            Answer::new("c", false),
            Answer::new("d", true),
            Answer::new("e", true),
        ];

        QuestionSet {
            settings: TestSettings::default(),
            questions: vec![q1, q2],
            updated_at: None,
        }
    }

    #[test]
    fn orders_are_one_based_array_positions() {
        let payload = SaveTestPayload::from_document(&document());

        for (i, q) in payload.questions.iter().enumerate() {
            assert_eq!(q.order, (i as i32) + 1);
            for (j, a) in q.answers.iter().enumerate() {
                assert_eq!(a.order, (j as i32) + 1);
            }
        }
    }

    #[test]
    fn settings_are_clamped_into_range() {
        let mut doc = document();
        doc.settings.split_count = 9;
        doc.settings.attempt_limit = -3;

        let payload = SaveTestPayload::from_document(&doc);
        assert_eq!(payload.settings.split_count, 2);
        assert_eq!(payload.settings.attempt_limit, 0);
    }

    #[test]
    fn identical_documents_build_equal_payloads() {
        let doc = document();
        assert_eq!(
            SaveTestPayload::from_document(&doc),
            SaveTestPayload::from_document(&doc.clone())
        );
    }

    #[test]
    fn validation_rejects_blank_statement() {
        let mut doc = document();
        doc.questions[0].statement.clear();
        let payload = SaveTestPayload::from_document(&doc);
        assert!(payload.validate().is_err());
    }
}
