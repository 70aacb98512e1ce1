use async_trait::async_trait;
use uuid::Uuid;

use testbank_editor::dto::save_dto::SaveTestPayload;
use testbank_editor::error::{Error, Result};
use testbank_editor::models::answer::Answer;
use testbank_editor::models::answer_type::{AnswerType, AnswerTypeCatalog};
use testbank_editor::models::question::Question;
use testbank_editor::models::question_set::{QuestionSet, TestSettings};
use testbank_editor::services::bank_api_service::QuestionBankApi;
use testbank_editor::services::editor_service::{EditorService, SaveOutcome};

mockall::mock! {
    QuestionBank {}

    #[async_trait]
    impl QuestionBankApi for QuestionBank {
        async fn load_question_set(&self, chapter_id: Uuid) -> Result<QuestionSet>;
        async fn save_question_set(
            &self,
            chapter_id: Uuid,
            payload: &SaveTestPayload,
        ) -> Result<QuestionSet>;
        async fn load_answer_types(&self) -> Result<Vec<AnswerType>>;
    }
}

const SINGLE: i64 = 1;
const MULTI: i64 = 2;

fn answer_types() -> Vec<AnswerType> {
    vec![
        AnswerType {
            id: SINGLE,
            name: "One correct answer".into(),
        },
        AnswerType {
            id: MULTI,
            name: "Multiple correct answers".into(),
        },
    ]
}

fn catalog() -> AnswerTypeCatalog {
    AnswerTypeCatalog::from_types(answer_types())
}

fn question(type_id: i64, answers: Vec<(&str, bool)>) -> Question {
    let mut q = Question::new("What is 2+2?", type_id);
    q.answers = answers
        .into_iter()
        .map(|(text, correct)| Answer::new(text, correct))
        .collect();
    q
}

fn document(questions: Vec<Question>) -> QuestionSet {
    QuestionSet {
        settings: TestSettings::default(),
        questions,
        updated_at: None,
    }
}

/// The canonical response a bank would produce for a payload: same content,
/// ids assigned where missing.
fn canonical_for(payload: &SaveTestPayload) -> QuestionSet {
    let questions = payload
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let mut question = Question::new(q.statement.clone(), q.answer_type_id);
            question.id = Some(q.id.unwrap_or((i as i64) + 100));
            question.weight = q.weight;
            question.answers = q
                .answers
                .iter()
                .enumerate()
                .map(|(j, a)| {
                    let mut answer = Answer::new(a.text.clone(), a.is_correct);
                    answer.id = Some(a.id.unwrap_or((j as i64) + 1000));
                    answer
                })
                .collect();
            question
        })
        .collect();

    QuestionSet {
        settings: TestSettings {
            randomize_order: payload.settings.randomize_order,
            reveal_incorrect: payload.settings.reveal_incorrect,
            scored: payload.settings.scored,
            split_count: payload.settings.split_count,
            attempt_limit: payload.settings.attempt_limit,
        },
        questions,
        updated_at: Some(chrono::Utc::now()),
    }
}

#[tokio::test]
async fn save_adopts_canonical_response() {
    let chapter_id = Uuid::new_v4();
    let mut editor = EditorService::new(
        chapter_id,
        document(vec![question(SINGLE, vec![("four", true), ("five", false)])]),
        catalog(),
    );
    editor.add_question();
    editor.toggle_expanded(0).unwrap();
    assert!(editor.is_dirty());

    let mut bank = MockQuestionBank::new();
    bank.expect_save_question_set()
        .times(1)
        .withf(move |id, payload| {
            *id == chapter_id
                && payload
                    .questions
                    .iter()
                    .enumerate()
                    .all(|(i, q)| q.order == (i as i32) + 1)
        })
        .returning(|_, payload| Ok(canonical_for(payload)));

    let outcome = editor.save(&bank).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);

    // canonical state replaced the document wholesale
    assert!(!editor.is_dirty());
    assert!(editor.expanded().iter().all(|&flag| flag));
    let doc = editor.document();
    assert!(doc.questions.iter().all(|q| q.id.is_some()));
    assert!(doc
        .questions
        .iter()
        .flat_map(|q| &q.answers)
        .all(|a| a.id.is_some()));
    assert_eq!(doc.questions[0].selected_index, Some(0));

    // round trip: a payload built from the adopted document is 1-based again
    let payload = SaveTestPayload::from_document(doc);
    for (i, q) in payload.questions.iter().enumerate() {
        assert_eq!(q.order, (i as i32) + 1);
        for (j, a) in q.answers.iter().enumerate() {
            assert_eq!(a.order, (j as i32) + 1);
        }
    }
}

#[tokio::test]
async fn unchanged_document_never_contacts_the_bank() {
    let mut editor = EditorService::new(
        Uuid::new_v4(),
        document(vec![question(SINGLE, vec![("four", true), ("five", false)])]),
        catalog(),
    );

    let mut bank = MockQuestionBank::new();
    bank.expect_save_question_set().never();

    let outcome = editor.save(&bank).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Unchanged);
}

#[tokio::test]
async fn saving_after_adoption_is_a_no_op_again() {
    let mut editor = EditorService::new(
        Uuid::new_v4(),
        document(vec![question(SINGLE, vec![("four", true), ("five", false)])]),
        catalog(),
    );
    editor.set_statement(0, "What is 1+3?").unwrap();

    let mut bank = MockQuestionBank::new();
    bank.expect_save_question_set()
        .times(1)
        .returning(|_, payload| Ok(canonical_for(payload)));

    assert_eq!(editor.save(&bank).await.unwrap(), SaveOutcome::Saved);
    // snapshot now matches the document; the second save is local only
    assert_eq!(editor.save(&bank).await.unwrap(), SaveOutcome::Unchanged);
}

#[tokio::test]
async fn failed_save_preserves_local_edits_and_can_be_retried() {
    let mut editor = EditorService::new(
        Uuid::new_v4(),
        document(vec![question(SINGLE, vec![("four", true), ("five", false)])]),
        catalog(),
    );
    editor.set_statement(0, "edited").unwrap();

    let mut seq = mockall::Sequence::new();
    let mut bank = MockQuestionBank::new();
    bank.expect_save_question_set()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(Error::RemoteSave("HTTP 500".into())));
    bank.expect_save_question_set()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, payload| Ok(canonical_for(payload)));

    let err = editor.save(&bank).await.unwrap_err();
    assert!(matches!(err, Error::RemoteSave(_)));
    assert!(editor.is_dirty());
    assert_eq!(editor.document().questions[0].statement, "edited");
    assert!(!editor.is_saving());

    // retry is simply invoking save again
    assert_eq!(editor.save(&bank).await.unwrap(), SaveOutcome::Saved);
    assert!(!editor.is_dirty());
}

#[tokio::test]
async fn incomplete_document_is_rejected_before_the_bank_is_called() {
    let mut editor = EditorService::new(
        Uuid::new_v4(),
        document(vec![question(SINGLE, vec![("only one", true)])]),
        catalog(),
    );
    editor.set_statement(0, "edited").unwrap();

    let mut bank = MockQuestionBank::new();
    bank.expect_save_question_set().never();

    let err = editor.save(&bank).await.unwrap_err();
    assert!(matches!(err, Error::Incomplete(_)));
    assert!(editor.is_dirty());
}

#[tokio::test]
async fn load_builds_a_reconciled_editor() {
    let chapter_id = Uuid::new_v4();
    // flags as they come off the wire, selected pointer not included
    let stored = document(vec![
        question(SINGLE, vec![("a", false), ("b", true)]),
        question(MULTI, vec![("c", true), ("d", true)]),
    ]);

    let mut bank = MockQuestionBank::new();
    bank.expect_load_answer_types()
        .times(1)
        .returning(|| Ok(answer_types()));
    let stored_clone = stored.clone();
    bank.expect_load_question_set()
        .times(1)
        .withf(move |id| *id == chapter_id)
        .returning(move |_| Ok(stored_clone.clone()));

    let editor = EditorService::load(&bank, chapter_id).await.unwrap();

    assert!(!editor.is_dirty());
    assert_eq!(editor.expanded(), &[true, true]);
    assert_eq!(editor.document().questions[0].selected_index, Some(1));
    assert_eq!(editor.document().questions[1].selected_index, None);
}

#[tokio::test]
async fn cross_question_drag_then_save_sends_reset_identity() {
    let chapter_id = Uuid::new_v4();
    let mut q1 = question(SINGLE, vec![("A", true), ("B", false), ("E", false)]);
    q1.id = Some(1);
    q1.answers[0].id = Some(10);
    q1.answers[1].id = Some(11);
    q1.answers[2].id = Some(12);
    let mut q2 = question(SINGLE, vec![("C", false), ("D", false)]);
    q2.id = Some(2);
    q2.answers[0].id = Some(20);
    q2.answers[1].id = Some(21);

    let mut editor = EditorService::new(chapter_id, document(vec![q1, q2]), catalog());
    editor.move_answer(0, 0, 1, 0).unwrap();

    // invariant: the moved answer lost its persisted identity
    assert_eq!(editor.document().questions[1].answers[0].id, None);

    let mut bank = MockQuestionBank::new();
    bank.expect_save_question_set()
        .times(1)
        .withf(|_, payload| {
            let moved = &payload.questions[1].answers[0];
            moved.id.is_none() && moved.text == "A" && moved.is_correct
        })
        .returning(|_, payload| Ok(canonical_for(payload)));

    // q1 lost its only correct answer, mark one so the save is accepted
    editor.set_correct_single(0, 0).unwrap();
    assert_eq!(editor.save(&bank).await.unwrap(), SaveOutcome::Saved);
}
