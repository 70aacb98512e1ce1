use crate::error::{Error, Result};
use crate::models::answer_type::AnswerTypeCatalog;
use crate::models::question_set::QuestionSet;
use crate::services::reconcile_service::Reconciler;
use crate::utils::splice::index_after_move;

/// Index remapping for drag-and-drop. Both operations are synchronous and
/// leave the document in a consistent state; the drag UI only supplies
/// indices.
pub struct ReorderEngine;

impl ReorderEngine {
    /// Move a question within the test. The expansion flags are spliced in
    /// lockstep so they stay index-aligned with the questions.
    pub fn move_question(
        document: &mut QuestionSet,
        expanded: &mut Vec<bool>,
        from: usize,
        to: usize,
    ) -> Result<()> {
        let len = document.questions.len();
        if from >= len {
            return Err(Error::out_of_range("question", from, len));
        }
        if to >= len {
            return Err(Error::out_of_range("question", to, len));
        }
        if from == to {
            return Ok(());
        }

        let question = document.questions.remove(from);
        document.questions.insert(to, question);
        let flag = expanded.remove(from);
        expanded.insert(to, flag);
        Ok(())
    }

    /// Move an answer within a question or into another question.
    ///
    /// Within one question this is a plain splice plus the selected-index
    /// shift rule. Across questions the moved answer loses its persisted
    /// identity (the bank models answers as children of one question), the
    /// source is reconciled, and on a single-selection destination a moved
    /// correct answer carries its correctness to the new slot while any other
    /// answer must not become correct by accident.
    pub fn move_answer(
        document: &mut QuestionSet,
        catalog: &AnswerTypeCatalog,
        source_question: usize,
        source_answer: usize,
        dest_question: usize,
        dest_answer: usize,
    ) -> Result<()> {
        let question_count = document.questions.len();
        if source_question >= question_count {
            return Err(Error::out_of_range("question", source_question, question_count));
        }
        if dest_question >= question_count {
            return Err(Error::out_of_range("question", dest_question, question_count));
        }

        if source_question == dest_question {
            return Self::move_within(document, source_question, source_answer, dest_answer);
        }

        let source_len = document.questions[source_question].answers.len();
        if source_answer >= source_len {
            return Err(Error::out_of_range("answer", source_answer, source_len));
        }
        let dest_len = document.questions[dest_question].answers.len();
        if dest_answer > dest_len {
            return Err(Error::out_of_range("answer", dest_answer, dest_len));
        }

        let mut moved = document.questions[source_question]
            .answers
            .remove(source_answer);
        moved.id = None;
        let was_correct = moved.is_correct;

        let source = &mut document.questions[source_question];
        if !catalog.is_multi_selection(source.answer_type_id) {
            Reconciler::reconcile(source, false);
        }

        let dest = &mut document.questions[dest_question];
        dest.answers.insert(dest_answer, moved);

        if !catalog.is_multi_selection(dest.answer_type_id) {
            if was_correct {
                // Correctness follows the moved answer to its new slot.
                for (index, answer) in dest.answers.iter_mut().enumerate() {
                    answer.is_correct = index == dest_answer;
                }
                dest.selected_index = Some(dest_answer);
            } else {
                Reconciler::reconcile(dest, false);
            }
        }
        Ok(())
    }

    fn move_within(
        document: &mut QuestionSet,
        question_index: usize,
        from: usize,
        to: usize,
    ) -> Result<()> {
        let question = &mut document.questions[question_index];
        let len = question.answers.len();
        if from >= len {
            return Err(Error::out_of_range("answer", from, len));
        }
        if to >= len {
            return Err(Error::out_of_range("answer", to, len));
        }
        if from == to {
            return Ok(());
        }

        let answer = question.answers.remove(from);
        question.answers.insert(to, answer);
        if let Some(selected) = question.selected_index {
            question.selected_index = Some(index_after_move(selected, from, to));
        }
        Ok(())
    }
}
