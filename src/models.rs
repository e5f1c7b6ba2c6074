//! Wire types for the backend's JSON surface.
//!
//! Field names follow the backend (`snake_case`). Optional fields default so
//! that older backend builds which omit them still decode.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================
// Session
// ============================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<MeUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetLanguageRequest {
    pub language: String,
}

/// Acknowledgement body of create calls (`{"message": .., "id": ..}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Created {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================
// Tasks
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub name: String,
    pub due_date: Option<NaiveDate>,
}

/// Partial update. `due_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(done: bool) -> Self {
        Self {
            is_completed: Some(done),
            ..Self::default()
        }
    }

    pub fn renamed(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn due(date: Option<NaiveDate>) -> Self {
        Self {
            due_date: Some(date),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.due_date.is_none() && self.is_completed.is_none()
    }
}

// ============================================================
// Vocabulary & quiz
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub id: i64,
    pub source_word: String,
    pub translated_word: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVocab {
    pub source_word: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default)]
    pub id: Option<i64>,
    pub source_word: String,
    pub target_language: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizSet {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

// ============================================================
// Assignments
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    Basic,
    Translation,
    FillBlank,
    MultipleChoice,
    #[serde(other)]
    Unknown,
}

impl AssignmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Translation => "translation",
            Self::FillBlank => "fill_blank",
            Self::MultipleChoice => "multiple_choice",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Translation => "translation",
            Self::FillBlank => "fill blank",
            Self::MultipleChoice => "multiple choice",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "basic" => Ok(Self::Basic),
            "translation" => Ok(Self::Translation),
            "fill_blank" => Ok(Self::FillBlank),
            "multiple_choice" => Ok(Self::MultipleChoice),
            other => Err(format!("unknown assignment type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    pub language: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentContent {
    #[serde(default)]
    pub questions: BTreeMap<String, AssignmentQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub content: AssignmentContent,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Assignment {
    /// Question ids in display order: numeric ids ascending, then the rest.
    pub fn question_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.content.questions.keys().map(String::as_str).collect();
        ids.sort_by_key(|id| (id.parse::<u64>().unwrap_or(u64::MAX), id.to_string()));
        ids
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitResult {
    pub score: f64,
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub feedback: String,
}

// ============================================================
// Dashboard
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub tasks: TaskStats,
    #[serde(default)]
    pub vocabulary: VocabStats,
    #[serde(default)]
    pub summary: DashboardSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskStats {
    #[serde(default)]
    pub completion: Completion,
    #[serde(default)]
    pub created_over_time: BTreeMap<String, u32>,
    #[serde(default)]
    pub upcoming: Vec<UpcomingTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub pending: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpcomingTask {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VocabStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub by_language: BTreeMap<String, u32>,
    #[serde(default)]
    pub learned_over_time: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub total_vocab_words: u32,
    #[serde(default)]
    pub languages_studied: u32,
}

/// One row of the progress series: tasks created and words learned per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressPoint {
    pub date: String,
    pub tasks_created: u32,
    pub words_learned: u32,
}

impl Dashboard {
    /// Union of both time series, sorted by date, missing days as zero.
    pub fn progress_series(&self) -> Vec<ProgressPoint> {
        let tasks = &self.tasks.created_over_time;
        let words = &self.vocabulary.learned_over_time;
        let mut dates: Vec<&String> = tasks.keys().chain(words.keys()).collect();
        dates.sort();
        dates.dedup();

        dates
            .into_iter()
            .map(|date| ProgressPoint {
                date: date.clone(),
                tasks_created: tasks.get(date).copied().unwrap_or(0),
                words_learned: words.get(date).copied().unwrap_or(0),
            })
            .collect()
    }
}
