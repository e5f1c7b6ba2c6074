use std::collections::BTreeMap;

use crate::error::{ActionError, ActionResult};
use crate::models::{Assignment, AssignmentKind, SubmitRequest, SubmitResult};

/// An opened assignment together with the answers typed so far.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentViewer {
    assignment: Assignment,
    answers: BTreeMap<String, String>,
    result: Option<SubmitResult>,
}

impl AssignmentViewer {
    pub fn open(assignment: Assignment) -> Self {
        Self {
            assignment,
            answers: BTreeMap::new(),
            result: None,
        }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    pub fn result(&self) -> Option<&SubmitResult> {
        self.result.as_ref()
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.assignment.kind == AssignmentKind::MultipleChoice
    }

    /// Inputs are read-only once the server has scored the assignment.
    pub fn is_locked(&self) -> bool {
        self.assignment.is_completed || self.result.is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_locked()
    }

    pub fn set_answer(&mut self, question_id: &str, value: &str) -> ActionResult<()> {
        self.ensure_editable(question_id)?;
        if self.is_multiple_choice() {
            return Err(ActionError::validation("Choose an option number for multiple choice questions"));
        }
        self.answers.insert(question_id.to_string(), value.trim().to_string());
        Ok(())
    }

    /// `index` is zero-based; the backend grades the option index.
    pub fn choose_option(&mut self, question_id: &str, index: usize) -> ActionResult<()> {
        self.ensure_editable(question_id)?;
        if !self.is_multiple_choice() {
            return Err(ActionError::validation("This assignment takes free-text answers"));
        }
        let options = self
            .assignment
            .content
            .questions
            .get(question_id)
            .map(|q| q.options.len())
            .unwrap_or(0);
        if index >= options {
            return Err(ActionError::validation(format!("Question {question_id} has no option {}", index + 1)));
        }
        self.answers.insert(question_id.to_string(), index.to_string());
        Ok(())
    }

    /// Free-text questions left blank are sent as empty strings; unchosen
    /// multiple-choice questions are left out.
    pub fn submission(&self) -> ActionResult<SubmitRequest> {
        if self.is_locked() {
            return Err(ActionError::validation("Assignment already completed"));
        }
        let mut answers = self.answers.clone();
        if !self.is_multiple_choice() {
            for id in self.assignment.content.questions.keys() {
                answers.entry(id.clone()).or_default();
            }
        }
        Ok(SubmitRequest { answers })
    }

    pub fn record_result(&mut self, result: SubmitResult) {
        self.assignment.is_completed = true;
        self.assignment.score = Some(result.score);
        self.result = Some(result);
    }

    fn ensure_editable(&self, question_id: &str) -> ActionResult<()> {
        if self.is_locked() {
            return Err(ActionError::validation("Assignment already completed"));
        }
        if !self.assignment.content.questions.contains_key(question_id) {
            return Err(ActionError::validation(format!("No question {question_id}")));
        }
        Ok(())
    }
}
