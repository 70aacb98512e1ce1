use crate::models::answer_type::AnswerTypeCatalog;
use crate::models::question::Question;
use crate::models::question_set::QuestionSet;

/// Restores a question's correctness state after any mutation that can break
/// it: answer-type changes, answer insertion/removal, cross-question moves.
pub struct Reconciler;

impl Reconciler {
    /// Re-derive a consistent correctness state for one question.
    ///
    /// Multi-selection: any subset of answers may be correct and the selected
    /// pointer is meaningless, so it is cleared and the flags are left alone.
    /// Single-selection: the first answer marked correct wins, every other
    /// flag is cleared, and `selected_index` points at the winner (or is
    /// `None` when nothing is marked). Idempotent.
    pub fn reconcile(question: &mut Question, multiple: bool) {
        if multiple {
            question.selected_index = None;
            return;
        }

        let first_correct = question.answers.iter().position(|a| a.is_correct);
        for (index, answer) in question.answers.iter_mut().enumerate() {
            answer.is_correct = Some(index) == first_correct;
        }
        question.selected_index = first_correct;
    }

    /// Reconcile every question in the document. Used after load, reset and
    /// canonical-response adoption, where `selected_index` has to be rebuilt
    /// because it is not part of the wire format.
    pub fn reconcile_all(document: &mut QuestionSet, catalog: &AnswerTypeCatalog) {
        for question in &mut document.questions {
            let multiple = catalog.is_multi_selection(question.answer_type_id);
            Self::reconcile(question, multiple);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer::Answer;

    fn question(flags: &[bool]) -> Question {
        let mut q = Question::new("q", 1);
        q.answers = flags
            .iter()
            .enumerate()
            .map(|(i, &correct)| Answer::new(format!("a{}", i), correct))
            .collect();
        q
    }

    #[test]
    fn single_selection_keeps_first_correct_only() {
        let mut q = question(&[false, true, true]);
        Reconciler::reconcile(&mut q, false);

        assert_eq!(q.selected_index, Some(1));
        let flags: Vec<bool> = q.answers.iter().map(|a| a.is_correct).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn single_selection_with_no_correct_clears_pointer() {
        let mut q = question(&[false, false]);
        Reconciler::reconcile(&mut q, false);

        assert_eq!(q.selected_index, None);
        assert!(q.answers.iter().all(|a| !a.is_correct));
    }

    #[test]
    fn multi_selection_leaves_flags_and_clears_pointer() {
        let mut q = question(&[true, false, true]);
        q.selected_index = Some(0);
        Reconciler::reconcile(&mut q, true);

        assert_eq!(q.selected_index, None);
        let flags: Vec<bool> = q.answers.iter().map(|a| a.is_correct).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn reconcile_is_idempotent() {
        for multiple in [false, true] {
            let mut once = question(&[true, true, false]);
            Reconciler::reconcile(&mut once, multiple);
            let mut twice = once.clone();
            Reconciler::reconcile(&mut twice, multiple);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn empty_question_is_handled() {
        let mut q = question(&[]);
        Reconciler::reconcile(&mut q, false);
        assert_eq!(q.selected_index, None);
    }
}
