//! Client-side checks for task and vocabulary input. A failure here means no
//! request is sent.

use chrono::NaiveDate;

use crate::error::{ActionError, ActionResult};
use crate::models::{NewTask, NewVocab, TaskPatch};

pub fn new_task(name: &str, due_date: Option<NaiveDate>) -> ActionResult<NewTask> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ActionError::validation("Please enter a task name"));
    }
    Ok(NewTask {
        name: name.to_string(),
        due_date,
    })
}

pub fn task_patch(mut patch: TaskPatch) -> ActionResult<TaskPatch> {
    if patch.is_empty() {
        return Err(ActionError::validation("Nothing to update"));
    }
    if let Some(name) = patch.name.take() {
        let name = name.trim();
        if name.is_empty() {
            return Err(ActionError::validation("Please enter a task name"));
        }
        patch.name = Some(name.to_string());
    }
    Ok(patch)
}

/// Falls back to the preferred language when none is typed.
pub fn new_vocab(
    source_word: &str,
    target_language: Option<&str>,
    preferred_language: Option<&str>,
) -> ActionResult<NewVocab> {
    let typed = target_language
        .map(|lang| lang.trim().to_lowercase())
        .filter(|lang| !lang.is_empty());
    let target_language = typed.or_else(|| preferred_language.map(str::to_string));

    let source_word = source_word.trim();
    if source_word.is_empty() {
        return Err(ActionError::validation("Please enter a word to learn"));
    }
    let Some(target_language) = target_language else {
        return Err(ActionError::validation("Please select a learning language first"));
    };

    Ok(NewVocab {
        source_word: source_word.to_string(),
        target_language,
    })
}

pub fn parse_due_date(raw: &str) -> ActionResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ActionError::validation(format!("Invalid due date '{}', expected YYYY-MM-DD", raw.trim())))
}
