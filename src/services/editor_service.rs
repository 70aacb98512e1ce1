use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::save_dto::SaveTestPayload;
use crate::error::{Error, Result};
use crate::models::answer::Answer;
use crate::models::answer_type::AnswerTypeCatalog;
use crate::models::question::Question;
use crate::models::question_set::{
    QuestionSet, ATTEMPT_LIMIT_MAX, ATTEMPT_LIMIT_MIN, SPLIT_COUNT_MAX, SPLIT_COUNT_MIN,
};
use crate::services::bank_api_service::QuestionBankApi;
use crate::services::reconcile_service::Reconciler;
use crate::services::reorder_service::ReorderEngine;

const PLACEHOLDER_STATEMENT: &str = "New question";
const PLACEHOLDER_ANSWERS: [&str; 2] = ["Answer 1", "Answer 2"];
const PLACEHOLDER_ANSWER: &str = "New answer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document matched the last loaded/saved state; the bank was not
    /// contacted.
    Unchanged,
    Saved,
}

/// The single owner of a chapter's in-memory question set.
///
/// All mutations go through the named operations below; external components
/// only read snapshots. Each operation re-establishes the correctness
/// invariants (one marked answer at most on single-selection questions,
/// expansion flags aligned with the question list) before it returns.
pub struct EditorService {
    chapter_id: Uuid,
    document: QuestionSet,
    original: QuestionSet,
    expanded: Vec<bool>,
    catalog: AnswerTypeCatalog,
    dirty: bool,
    saving: bool,
}

impl EditorService {
    pub fn new(chapter_id: Uuid, mut document: QuestionSet, catalog: AnswerTypeCatalog) -> Self {
        // selected_index is not part of the wire format, rebuild it.
        Reconciler::reconcile_all(&mut document, &catalog);
        let expanded = vec![true; document.questions.len()];
        Self {
            chapter_id,
            original: document.clone(),
            document,
            expanded,
            catalog,
            dirty: false,
            saving: false,
        }
    }

    /// Fetch the answer-type catalog and the chapter's question set from the
    /// bank and build an editor over them.
    pub async fn load(api: &dyn QuestionBankApi, chapter_id: Uuid) -> Result<Self> {
        let types = api.load_answer_types().await?;
        let catalog = AnswerTypeCatalog::from_types(types);
        let document = api.load_question_set(chapter_id).await?;
        info!(%chapter_id, questions = document.questions.len(), "question set loaded");
        Ok(Self::new(chapter_id, document, catalog))
    }

    // --- Read access ---

    pub fn chapter_id(&self) -> Uuid {
        self.chapter_id
    }

    pub fn document(&self) -> &QuestionSet {
        &self.document
    }

    pub fn catalog(&self) -> &AnswerTypeCatalog {
        &self.catalog
    }

    pub fn expanded(&self) -> &[bool] {
        &self.expanded
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    // --- Question operations ---

    pub fn add_question(&mut self) {
        let mut question = Question::new(PLACEHOLDER_STATEMENT, self.catalog.default_type_id());
        question.answers = vec![
            Answer::new(PLACEHOLDER_ANSWERS[0], true),
            Answer::new(PLACEHOLDER_ANSWERS[1], false),
        ];
        self.add_question_with(question);
    }

    pub fn add_question_with(&mut self, mut question: Question) {
        let multiple = self.catalog.is_multi_selection(question.answer_type_id);
        Reconciler::reconcile(&mut question, multiple);
        self.document.questions.push(question);
        self.expanded.push(true);
        self.mark_dirty();
    }

    /// Deep-copy the question at `index` and insert the copy right after it.
    /// All ids are reset so the bank treats the copy as new; the copy is
    /// already invariant-consistent, so no reconciliation runs.
    pub fn duplicate_question(&mut self, index: usize) -> Result<()> {
        self.check_question(index)?;
        let copy = self.document.questions[index].duplicated();
        self.document.questions.insert(index + 1, copy);
        let flag = self.expanded[index];
        self.expanded.insert(index + 1, flag);
        self.mark_dirty();
        Ok(())
    }

    pub fn remove_question(&mut self, index: usize) -> Result<()> {
        self.check_question(index)?;
        self.document.questions.remove(index);
        self.expanded.remove(index);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_statement(&mut self, index: usize, statement: impl Into<String>) -> Result<()> {
        self.check_question(index)?;
        self.document.questions[index].statement = statement.into();
        self.mark_dirty();
        Ok(())
    }

    /// Weight as entered in a form field: truncated, floored at zero.
    pub fn set_weight(&mut self, index: usize, raw: f64) -> Result<()> {
        self.check_question(index)?;
        self.document.questions[index].weight = Question::coerce_weight(raw);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_answer_type(&mut self, index: usize, answer_type_id: i64) -> Result<()> {
        self.check_question(index)?;
        let question = &mut self.document.questions[index];
        question.answer_type_id = answer_type_id;
        let multiple = self.catalog.is_multi_selection(answer_type_id);
        Reconciler::reconcile(question, multiple);
        self.mark_dirty();
        Ok(())
    }

    pub fn move_question(&mut self, from: usize, to: usize) -> Result<()> {
        ReorderEngine::move_question(&mut self.document, &mut self.expanded, from, to)
            .inspect_err(|e| warn!(%e, "move_question rejected"))?;
        if from != to {
            self.mark_dirty();
        }
        Ok(())
    }

    // --- Answer operations ---

    /// Append a placeholder answer. On a single-selection question with no
    /// selected answer yet, the new answer becomes the selected one.
    pub fn add_answer(&mut self, question_index: usize) -> Result<()> {
        self.check_question(question_index)?;
        let multiple = self.is_multi(question_index);
        let question = &mut self.document.questions[question_index];

        let mut answer = Answer::new(PLACEHOLDER_ANSWER, false);
        if !multiple && question.selected_index.is_none() {
            answer.is_correct = true;
            question.answers.push(answer);
            question.selected_index = Some(question.answers.len() - 1);
        } else {
            question.answers.push(answer);
        }
        self.mark_dirty();
        Ok(())
    }

    /// Copy an answer and insert the copy right after the source. On a
    /// single-selection question the copy is never marked correct, otherwise
    /// duplicating the selected answer would yield two correct answers.
    pub fn duplicate_answer(&mut self, question_index: usize, answer_index: usize) -> Result<()> {
        self.check_answer(question_index, answer_index)?;
        let multiple = self.is_multi(question_index);
        let question = &mut self.document.questions[question_index];

        let mut copy = question.answers[answer_index].clone();
        copy.id = None;
        if !multiple {
            copy.is_correct = false;
        }
        question.answers.insert(answer_index + 1, copy);
        if let Some(selected) = question.selected_index {
            if selected > answer_index {
                question.selected_index = Some(selected + 1);
            }
        }
        self.mark_dirty();
        Ok(())
    }

    pub fn remove_answer(&mut self, question_index: usize, answer_index: usize) -> Result<()> {
        self.check_answer(question_index, answer_index)?;
        let multiple = self.is_multi(question_index);
        let question = &mut self.document.questions[question_index];

        question.answers.remove(answer_index);
        if !multiple {
            question.selected_index = match question.selected_index {
                Some(selected) if selected == answer_index => None,
                Some(selected) if selected > answer_index => Some(selected - 1),
                other => other,
            };
            let selected = question.selected_index;
            for (index, answer) in question.answers.iter_mut().enumerate() {
                answer.is_correct = Some(index) == selected;
            }
        }
        self.mark_dirty();
        Ok(())
    }

    pub fn set_answer_text(
        &mut self,
        question_index: usize,
        answer_index: usize,
        text: impl Into<String>,
    ) -> Result<()> {
        self.check_answer(question_index, answer_index)?;
        self.document.questions[question_index].answers[answer_index].text = text.into();
        self.mark_dirty();
        Ok(())
    }

    /// Single-selection questions: mark one answer correct and unmark all of
    /// its siblings.
    pub fn set_correct_single(&mut self, question_index: usize, answer_index: usize) -> Result<()> {
        self.check_answer(question_index, answer_index)?;
        let question = &mut self.document.questions[question_index];
        for (index, answer) in question.answers.iter_mut().enumerate() {
            answer.is_correct = index == answer_index;
        }
        question.selected_index = Some(answer_index);
        self.mark_dirty();
        Ok(())
    }

    /// Multi-selection questions: flip one flag, siblings untouched.
    pub fn toggle_correct_multi(
        &mut self,
        question_index: usize,
        answer_index: usize,
        value: bool,
    ) -> Result<()> {
        self.check_answer(question_index, answer_index)?;
        self.document.questions[question_index].answers[answer_index].is_correct = value;
        self.mark_dirty();
        Ok(())
    }

    pub fn move_answer(
        &mut self,
        source_question: usize,
        source_answer: usize,
        dest_question: usize,
        dest_answer: usize,
    ) -> Result<()> {
        ReorderEngine::move_answer(
            &mut self.document,
            &self.catalog,
            source_question,
            source_answer,
            dest_question,
            dest_answer,
        )
        .inspect_err(|e| warn!(%e, "move_answer rejected"))?;
        if source_question != dest_question || source_answer != dest_answer {
            self.mark_dirty();
        }
        Ok(())
    }

    // --- Settings ---

    pub fn set_randomize_order(&mut self, value: bool) {
        self.document.settings.randomize_order = value;
        self.mark_dirty();
    }

    pub fn set_reveal_incorrect(&mut self, value: bool) {
        self.document.settings.reveal_incorrect = value;
        self.mark_dirty();
    }

    pub fn set_scored(&mut self, value: bool) {
        self.document.settings.scored = value;
        self.mark_dirty();
    }

    pub fn set_split_count(&mut self, value: i32) {
        self.document.settings.split_count = value.clamp(SPLIT_COUNT_MIN, SPLIT_COUNT_MAX);
        self.mark_dirty();
    }

    pub fn set_attempt_limit(&mut self, value: i32) {
        self.document.settings.attempt_limit = value.clamp(ATTEMPT_LIMIT_MIN, ATTEMPT_LIMIT_MAX);
        self.mark_dirty();
    }

    // --- Presentation state ---

    pub fn toggle_expanded(&mut self, index: usize) -> Result<()> {
        self.check_question(index)?;
        self.expanded[index] = !self.expanded[index];
        Ok(())
    }

    pub fn set_all_expanded(&mut self, value: bool) {
        for flag in &mut self.expanded {
            *flag = value;
        }
    }

    // --- Snapshot / save ---

    /// Discard local edits and rebuild the document from the last
    /// loaded/saved state.
    pub fn reset_to_snapshot(&mut self) {
        let mut document = self.original.clone();
        Reconciler::reconcile_all(&mut document, &self.catalog);
        self.expanded = vec![true; document.questions.len()];
        self.document = document;
        self.dirty = false;
    }

    /// Submit-readiness problems, one message per violated rule: every
    /// question needs a statement, at least two non-blank answers and a
    /// marked-correct answer.
    pub fn readiness_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (index, question) in self.document.questions.iter().enumerate() {
            let number = index + 1;
            if question.statement.trim().is_empty() {
                issues.push(format!("question {}: statement is empty", number));
            }
            let answerable = question.answers.iter().filter(|a| a.has_text()).count();
            if answerable < 2 {
                issues.push(format!("question {}: needs at least two answers", number));
            }
            if !question.answers.iter().any(|a| a.is_correct) {
                issues.push(format!("question {}: no answer is marked correct", number));
            }
        }
        issues
    }

    /// Persist the current document as a full replace and adopt the bank's
    /// canonical response.
    ///
    /// When nothing changed against the snapshot the bank is not contacted.
    /// When the round trip fails, local edits are preserved unchanged and the
    /// save can simply be retried.
    pub async fn save(&mut self, api: &dyn QuestionBankApi) -> Result<SaveOutcome> {
        if self.saving {
            return Err(Error::SaveInFlight);
        }

        let payload = SaveTestPayload::from_document(&self.document);
        if payload == SaveTestPayload::from_document(&self.original) {
            info!(chapter_id = %self.chapter_id, "no changes to save");
            return Ok(SaveOutcome::Unchanged);
        }

        let issues = self.readiness_issues();
        if !issues.is_empty() {
            return Err(Error::Incomplete(issues.join("; ")));
        }

        self.saving = true;
        let result = api.save_question_set(self.chapter_id, &payload).await;
        self.saving = false;

        let canonical = result?;
        self.adopt(canonical);
        info!(
            chapter_id = %self.chapter_id,
            questions = self.document.questions.len(),
            "question set saved"
        );
        Ok(SaveOutcome::Saved)
    }

    /// Replace the whole document with the bank's canonical state. Not a
    /// merge: the response is the new source of truth.
    fn adopt(&mut self, mut canonical: QuestionSet) {
        Reconciler::reconcile_all(&mut canonical, &self.catalog);
        self.expanded = vec![true; canonical.questions.len()];
        self.original = canonical.clone();
        self.document = canonical;
        self.dirty = false;
    }

    // --- Internals ---

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn is_multi(&self, question_index: usize) -> bool {
        self.catalog
            .is_multi_selection(self.document.questions[question_index].answer_type_id)
    }

    fn check_question(&self, index: usize) -> Result<()> {
        let len = self.document.questions.len();
        if index >= len {
            warn!(index, len, "question index out of range");
            return Err(Error::out_of_range("question", index, len));
        }
        Ok(())
    }

    fn check_answer(&self, question_index: usize, answer_index: usize) -> Result<()> {
        self.check_question(question_index)?;
        let len = self.document.questions[question_index].answers.len();
        if answer_index >= len {
            warn!(question_index, answer_index, len, "answer index out of range");
            return Err(Error::out_of_range("answer", answer_index, len));
        }
        Ok(())
    }
}
