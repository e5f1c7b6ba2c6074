//! Text projection of [`AppState`]. Rendering is pure: the same state always
//! yields the same [`View`].

use std::fmt;

use crate::app::AppState;
use crate::assignments::AssignmentViewer;
use crate::models::Dashboard;
use crate::quiz::{Quiz, QuizPhase};
use crate::view::{visibility, Section, Visibility};

const BAR_WIDTH: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub section: Section,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub visibility: Visibility,
    pub status: String,
    pub panels: Vec<Panel>,
}

impl View {
    pub fn panel(&self, section: Section) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.section == section)
    }

    /// Whether any visible line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.status.contains(needle)
            || self
                .panels
                .iter()
                .any(|panel| panel.lines.iter().any(|line| line.contains(needle)))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status)?;
        for panel in &self.panels {
            writeln!(f)?;
            writeln!(f, "== {} ==", panel.section.title())?;
            for line in &panel.lines {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}

pub fn render(state: &AppState) -> View {
    let session = &state.session;
    let visibility = visibility(session.authenticated, session.has_language());

    let status = match (&session.username, session.authenticated) {
        (Some(name), true) => match &session.preferred_language {
            Some(lang) => format!("Signed in as {name} · learning {} · [logout]", lang.to_uppercase()),
            None => format!("Signed in as {name} · [logout]"),
        },
        _ => "Not signed in".to_string(),
    };

    let mut panels = Vec::new();
    if !session.authenticated {
        // Only the chosen auth pane is in front.
        let section = state.auth_pane.section();
        panels.push(Panel {
            section,
            lines: with_notice(state, section, auth_lines(section)),
        });
    } else {
        for section in visibility.sections() {
            let lines = match section {
                Section::LanguageSelection => {
                    vec!["Pick the language you want to learn: `language CODE` (e.g. es, fr, de).".to_string()]
                }
                Section::Dashboard => dashboard_lines(state),
                Section::Tasks => task_lines(state),
                Section::Vocab => vocab_lines(state),
                Section::Quiz => quiz_lines(state.quiz.as_ref()),
                Section::Assignments => assignment_lines(state),
                _ => Vec::new(),
            };
            panels.push(Panel {
                section,
                lines: with_notice(state, section, lines),
            });
        }
    }

    View {
        visibility,
        status,
        panels,
    }
}

fn with_notice(state: &AppState, section: Section, mut lines: Vec<String>) -> Vec<String> {
    if let Some(notice) = state.notice(section) {
        let prefix = if notice.is_error { "Error" } else { "OK" };
        lines.insert(0, format!("[{prefix}] {}", notice.text));
    }
    lines
}

fn auth_lines(section: Section) -> Vec<String> {
    match section {
        Section::Login => vec![
            "login USERNAME PASSWORD".to_string(),
            "No account yet? `register-form`".to_string(),
        ],
        Section::Register => vec![
            "register USERNAME EMAIL PASSWORD".to_string(),
            "Already registered? `login-form`".to_string(),
        ],
        _ => vec![
            "Learn a language one word at a time.".to_string(),
            "`login-form` to sign in, `register-form` to create an account.".to_string(),
        ],
    }
}

fn load_error(name: &str, error: Option<&str>) -> Option<String> {
    error.map(|err| format!("[Error] Could not load {name}: {err}"))
}

fn dashboard_lines(state: &AppState) -> Vec<String> {
    let mut lines: Vec<String> = load_error("dashboard", state.dashboard.last_error()).into_iter().collect();
    match state.dashboard.value() {
        Some(dashboard) => lines.extend(dashboard_body(dashboard)),
        None => lines.push("Loading...".to_string()),
    }
    lines
}

fn dashboard_body(dashboard: &Dashboard) -> Vec<String> {
    let summary = &dashboard.summary;
    let mut lines = vec![
        format!(
            "Tasks: {} total, {} completed · Words: {} · Languages: {}",
            summary.total_tasks, summary.completed_tasks, summary.total_vocab_words, summary.languages_studied
        ),
    ];

    let completion = &dashboard.tasks.completion;
    if completion.total > 0 {
        lines.push(format!(
            "Completion: {} done / {} pending",
            completion.completed, completion.pending
        ));
    }

    if !dashboard.tasks.upcoming.is_empty() {
        lines.push("Upcoming:".to_string());
        for task in &dashboard.tasks.upcoming {
            match task.due_date {
                Some(due) => lines.push(format!("  {due} {}", task.name)),
                None => lines.push(format!("  {}", task.name)),
            }
        }
    }

    let by_language = &dashboard.vocabulary.by_language;
    if let Some(max) = by_language.values().copied().max().filter(|max| *max > 0) {
        lines.push("Words by language:".to_string());
        for (lang, count) in by_language {
            let width = (count * BAR_WIDTH).div_ceil(max) as usize;
            lines.push(format!("  {:<3} {} {count}", lang.to_uppercase(), "#".repeat(width)));
        }
    }

    let series = dashboard.progress_series();
    if !series.is_empty() {
        lines.push("Progress (tasks / words):".to_string());
        for point in series {
            lines.push(format!("  {} {} / {}", point.date, point.tasks_created, point.words_learned));
        }
    }
    lines
}

fn task_lines(state: &AppState) -> Vec<String> {
    let mut lines: Vec<String> = load_error("tasks", state.tasks.last_error()).into_iter().collect();
    if !state.tasks.is_loaded() {
        lines.push("Loading...".to_string());
        return lines;
    }
    if state.tasks.is_empty() {
        lines.push("No tasks yet. Add one above!".to_string());
    }
    for task in state.tasks.items() {
        let mark = if task.is_completed { "x" } else { " " };
        let due = task
            .due_date
            .map(|date| format!(" (due {date})"))
            .unwrap_or_default();
        lines.push(format!("[{mark}] #{} {}{due}", task.id, task.name));
    }
    lines
}

fn vocab_lines(state: &AppState) -> Vec<String> {
    let mut lines: Vec<String> = load_error("vocabulary", state.vocab.last_error()).into_iter().collect();
    if !state.vocab.is_loaded() {
        lines.push("Loading...".to_string());
        return lines;
    }
    if state.vocab.is_empty() {
        lines.push("No words yet. Add your first word!".to_string());
    }
    for entry in state.vocab.items() {
        lines.push(format!(
            "{} → {} ({})",
            entry.source_word, entry.translated_word, entry.target_language
        ));
    }
    lines
}

fn quiz_lines(quiz: Option<&Quiz>) -> Vec<String> {
    let Some(quiz) = quiz else {
        return vec!["`quiz start` to test yourself.".to_string()];
    };

    match quiz.phase() {
        QuizPhase::Loading => return vec!["Loading quiz...".to_string()],
        QuizPhase::Empty => return vec!["Add vocabulary to start a quiz.".to_string()],
        QuizPhase::Active | QuizPhase::Complete => {}
    }

    let mut lines = Vec::new();
    for (i, item) in quiz.items().iter().enumerate() {
        let question = &item.question;
        lines.push(format!(
            "Question {}: Translate \"{}\" to {}",
            i + 1,
            question.source_word,
            question.target_language.to_uppercase()
        ));
        match &item.graded {
            Some(graded) if graded.correct => lines.push(format!("  {} ✓ Correct!", graded.given)),
            Some(graded) => lines.push(format!(
                "  {} ✗ Incorrect. The answer is: {}",
                graded.given, question.answer
            )),
            None => {}
        }
    }

    if let Some(score) = quiz.score() {
        lines.push(format!(
            "Quiz Complete! Score: {} / {} ({}%)",
            score.correct, score.total, score.percent
        ));
        lines.push(if score.passed() {
            "Great job! Keep it up!".to_string()
        } else {
            "Keep practicing! Review your vocabulary.".to_string()
        });
    } else {
        lines.push(format!("{} of {} answered", quiz.answered(), quiz.items().len()));
    }
    lines
}

fn assignment_lines(state: &AppState) -> Vec<String> {
    if let Some(viewer) = &state.viewer {
        return viewer_lines(viewer);
    }

    let mut lines: Vec<String> = load_error("assignments", state.assignments.last_error()).into_iter().collect();
    if !state.assignments.is_loaded() {
        lines.push("Loading...".to_string());
        return lines;
    }
    if state.assignments.is_empty() {
        lines.push("No assignments yet. Generate one to get started!".to_string());
    }
    for summary in state.assignments.items() {
        let status = match (summary.is_completed, summary.score) {
            (true, Some(score)) => format!("completed, {score:.1}%"),
            (true, None) => "completed".to_string(),
            (false, _) => "pending".to_string(),
        };
        lines.push(format!(
            "#{} {} [{}, {}] {status}",
            summary.id,
            summary.title,
            summary.kind.label(),
            summary.language.to_uppercase()
        ));
    }
    lines
}

fn viewer_lines(viewer: &AssignmentViewer) -> Vec<String> {
    let assignment = viewer.assignment();
    let mut lines = vec![format!("{} ({})", assignment.title, assignment.kind.label())];
    if let Some(description) = assignment.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(description.to_string());
    }

    for id in assignment.question_ids() {
        let Some(question) = assignment.content.questions.get(id) else {
            continue;
        };
        lines.push(format!("{id}. {}", question.question));
        for (n, option) in question.options.iter().enumerate() {
            let chosen = viewer.answers().get(id) == Some(&n.to_string());
            let marker = if chosen { "*" } else { " " };
            lines.push(format!("   {marker}{}) {option}", n + 1));
        }
        if let Some(hint) = &question.hint {
            lines.push(format!("   Hint: {hint}"));
        }
        if !viewer.is_multiple_choice() {
            if let Some(answer) = viewer.answers().get(id) {
                lines.push(format!("   Answer: {answer}"));
            }
        }
    }

    if let Some(result) = viewer.result() {
        lines.push(format!(
            "Score: {:.1}% ({} / {} correct)",
            result.score, result.correct, result.total
        ));
        lines.push(result.feedback.clone());
    } else if let (true, Some(score)) = (assignment.is_completed, assignment.score) {
        lines.push(format!("Completed. Score: {score:.1}%"));
    } else if viewer.can_submit() {
        lines.push("`assignment submit` when you are done.".to_string());
    }
    lines
}
