//! The top-level controller.
//!
//! [`App`] owns the [`AppState`] and is the only thing that mutates it. Every
//! action is an `async fn` that finishes only after its follow-up reloads, so
//! callers can sequence actions. Errors are returned and also recorded as a
//! notice on the section that triggered them.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::api::ApiClient;
use crate::assignments::AssignmentViewer;
use crate::error::{ActionError, ActionResult, ApiError};
use crate::forms;
use crate::lists::{ResourceList, Synced};
use crate::models::{
    AssignmentKind, AssignmentSummary, Dashboard, GenerateRequest, SubmitResult, Task, TaskPatch,
    VocabEntry,
};
use crate::quiz::{AnswerOutcome, Quiz};
use crate::render::{render, View};
use crate::session::{self, Session};
use crate::view::{AuthPane, Section};

/// Asked before destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub session: Session,
    pub auth_pane: AuthPane,
    pub tasks: ResourceList<Task>,
    pub vocab: ResourceList<VocabEntry>,
    pub assignments: ResourceList<AssignmentSummary>,
    pub dashboard: Synced<Dashboard>,
    pub quiz: Option<Quiz>,
    pub viewer: Option<AssignmentViewer>,
    pub notices: BTreeMap<Section, Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::signed_out(),
            auth_pane: AuthPane::default(),
            tasks: Synced::new("tasks"),
            vocab: Synced::new("vocab"),
            assignments: Synced::new("assignments"),
            dashboard: Synced::new("dashboard"),
            quiz: None,
            viewer: None,
            notices: BTreeMap::new(),
        }
    }
}

impl AppState {
    pub fn notice(&self, section: Section) -> Option<&Notice> {
        self.notices.get(&section)
    }

    fn clear_user_data(&mut self) {
        self.tasks.clear();
        self.vocab.clear();
        self.assignments.clear();
        self.dashboard.clear();
        self.quiz = None;
        self.viewer = None;
    }
}

pub struct App {
    api: ApiClient,
    state: AppState,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: AppState::default(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> View {
        render(&self.state)
    }

    pub fn show_pane(&mut self, pane: AuthPane) {
        self.state.auth_pane = pane;
    }

    // ============================================================
    // Session
    // ============================================================

    /// Re-reads the session, then loads every view the session allows.
    pub async fn refresh(&mut self) {
        let session = Session::fetch(&self.api).await;
        tracing::debug!(
            authenticated = session.authenticated,
            language = session.preferred_language.as_deref().unwrap_or(""),
            "session refreshed"
        );
        self.state.session = session;

        if !self.state.session.authenticated {
            self.state.clear_user_data();
            return;
        }
        if self.state.session.has_language() {
            self.reload_all().await;
        }
    }

    /// Loads all four views concurrently and returns once each has settled.
    pub async fn reload_all(&mut self) {
        let api = &self.api;
        let AppState {
            tasks,
            vocab,
            assignments,
            dashboard,
            ..
        } = &mut self.state;

        tokio::join!(
            dashboard.load_with(api.dashboard()),
            tasks.load_with(api.list_tasks()),
            vocab.load_with(api.list_vocab()),
            assignments.load_with(api.list_assignments()),
        );
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ActionResult<()> {
        self.state.auth_pane = AuthPane::Login;
        let request = match session::login_request(username, password) {
            Ok(request) => request,
            Err(err) => return Err(self.fail(Section::Login, err)),
        };

        if let Err(err) = self.api.login(&request).await {
            return Err(self.fail(Section::Login, err.into()));
        }

        tracing::info!(username = %request.username, "logged in");
        self.refresh().await;
        self.notify(self.home_section(), "Logged in successfully!");
        Ok(())
    }

    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> ActionResult<()> {
        self.state.auth_pane = AuthPane::Register;
        let request = match session::register_request(username, email, password) {
            Ok(request) => request,
            Err(err) => return Err(self.fail(Section::Register, err)),
        };

        if let Err(err) = self.api.register(&request).await {
            return Err(self.fail(Section::Register, err.into()));
        }

        tracing::info!(username = %request.username, "account created");
        self.refresh().await;
        self.notify(self.home_section(), "Account created successfully! Welcome!");
        Ok(())
    }

    pub async fn logout(&mut self) -> ActionResult<()> {
        if let Err(err) = self.api.logout().await {
            tracing::warn!(error = %err, "logout failed");
            return Err(self.fail(self.home_section(), err.into()));
        }

        self.state.clear_user_data();
        self.state.notices.clear();
        self.state.auth_pane = AuthPane::Welcome;
        self.refresh().await;
        Ok(())
    }

    pub async fn set_language(&mut self, code: &str) -> ActionResult<()> {
        let request = match session::set_language_request(code) {
            Ok(request) => request,
            Err(err) => return Err(self.fail(Section::LanguageSelection, err)),
        };

        if let Err(err) = self.api.set_language(&request).await {
            return Err(self.fail(Section::LanguageSelection, err.into()));
        }

        self.refresh().await;
        self.notify(
            self.home_section(),
            &format!("Language set to {}!", request.language.to_uppercase()),
        );
        Ok(())
    }

    // ============================================================
    // Tasks
    // ============================================================

    pub async fn load_tasks(&mut self) -> bool {
        self.state.tasks.load_with(self.api.list_tasks()).await
    }

    pub async fn create_task(&mut self, name: &str, due_date: Option<NaiveDate>) -> ActionResult<()> {
        let task = match forms::new_task(name, due_date) {
            Ok(task) => task,
            Err(err) => return Err(self.fail(Section::Tasks, err)),
        };
        let result = self.api.create_task(&task).await.map(|_| ());
        self.after_mutation(Section::Tasks, result).await
    }

    pub async fn update_task(&mut self, id: i64, patch: TaskPatch) -> ActionResult<()> {
        let patch = match forms::task_patch(patch) {
            Ok(patch) => patch,
            Err(err) => return Err(self.fail(Section::Tasks, err)),
        };
        let result = self.api.update_task(id, &patch).await.map(|_| ());
        self.after_mutation(Section::Tasks, result).await
    }

    pub async fn set_task_completed(&mut self, id: i64, done: bool) -> ActionResult<()> {
        self.update_task(id, TaskPatch::completed(done)).await
    }

    /// `Ok(false)` when the confirmation was declined; nothing is sent then.
    pub async fn delete_task(&mut self, id: i64, confirm: &dyn Confirm) -> ActionResult<bool> {
        if !confirm.confirm("Are you sure you want to delete this task?") {
            tracing::debug!(task = id, "delete declined");
            return Ok(false);
        }
        let result = self.api.delete_task(id).await.map(|_| ());
        self.after_mutation(Section::Tasks, result).await?;
        Ok(true)
    }

    // ============================================================
    // Vocabulary & quiz
    // ============================================================

    pub async fn load_vocab(&mut self) -> bool {
        self.state.vocab.load_with(self.api.list_vocab()).await
    }

    pub async fn add_vocab(&mut self, source_word: &str, target_language: Option<&str>) -> ActionResult<()> {
        let preferred = self.state.session.preferred_language.clone();
        let entry = match forms::new_vocab(source_word, target_language, preferred.as_deref()) {
            Ok(entry) => entry,
            Err(err) => return Err(self.fail(Section::Vocab, err)),
        };
        let result = self.api.add_vocab(&entry).await.map(|_| ());
        self.after_mutation(Section::Vocab, result).await
    }

    pub async fn start_quiz(&mut self) -> ActionResult<()> {
        self.state.quiz = Some(Quiz::loading());
        match self.api.quiz().await {
            Ok(set) => {
                self.state.notices.remove(&Section::Quiz);
                self.state.quiz = Some(Quiz::start(set.questions));
                Ok(())
            }
            Err(err) => {
                self.state.quiz = None;
                Err(self.fail(Section::Quiz, err.into()))
            }
        }
    }

    /// `index` is zero-based.
    pub fn answer_quiz(&mut self, index: usize, input: &str) -> AnswerOutcome {
        match self.state.quiz.as_mut() {
            Some(quiz) => quiz.answer(index, input),
            None => AnswerOutcome::Ignored,
        }
    }

    // ============================================================
    // Assignments
    // ============================================================

    pub async fn load_assignments(&mut self) -> bool {
        self.state.assignments.load_with(self.api.list_assignments()).await
    }

    pub async fn generate_assignment(&mut self, kind: AssignmentKind) -> ActionResult<i64> {
        let request = GenerateRequest {
            kind,
            language: self.state.session.preferred_language.clone(),
        };

        let created = match self.api.generate_assignment(&request).await {
            Ok(created) => created,
            Err(err) => return Err(self.fail(Section::Assignments, err.into())),
        };
        let Some(id) = created.id else {
            let err = ApiError::decode("assignment response is missing an id");
            return Err(self.fail(Section::Assignments, err.into()));
        };

        tracing::info!(assignment = id, kind = %kind, "assignment generated");
        // The assignment exists on the server even if it cannot be opened.
        let opened = self.open_assignment(id).await;
        self.reload_with_dashboard(Section::Assignments).await;
        opened.map(|()| id)
    }

    pub async fn open_assignment(&mut self, id: i64) -> ActionResult<()> {
        match self.api.get_assignment(id).await {
            Ok(assignment) => {
                self.state.notices.remove(&Section::Assignments);
                self.state.viewer = Some(AssignmentViewer::open(assignment));
                Ok(())
            }
            Err(err) => Err(self.fail(Section::Assignments, err.into())),
        }
    }

    /// Multiple-choice answers are 1-based option numbers; anything else is
    /// free text.
    pub fn answer_assignment(&mut self, question_id: &str, value: &str) -> ActionResult<()> {
        let result = match self.state.viewer.as_mut() {
            None => Err(ActionError::validation("No assignment is open")),
            Some(viewer) if viewer.is_multiple_choice() => match value.trim().parse::<usize>() {
                Ok(n) if n >= 1 => viewer.choose_option(question_id, n - 1),
                _ => Err(ActionError::validation("Choose an option number for multiple choice questions")),
            },
            Some(viewer) => viewer.set_answer(question_id, value),
        };
        result.map_err(|err| self.fail(Section::Assignments, err))
    }

    pub async fn submit_assignment(&mut self) -> ActionResult<SubmitResult> {
        let prepared = match self.state.viewer.as_ref() {
            None => Err(ActionError::validation("No assignment is open")),
            Some(viewer) => viewer
                .submission()
                .map(|request| (viewer.assignment().id, request)),
        };
        let (id, request) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => return Err(self.fail(Section::Assignments, err)),
        };

        let result = match self.api.submit_assignment(id, &request).await {
            Ok(result) => result,
            Err(err) => return Err(self.fail(Section::Assignments, err.into())),
        };

        tracing::info!(assignment = id, score = result.score, "assignment submitted");
        if let Some(viewer) = self.state.viewer.as_mut() {
            if viewer.assignment().id == id {
                viewer.record_result(result.clone());
            }
        }
        self.reload_with_dashboard(Section::Assignments).await;
        Ok(result)
    }

    pub fn close_assignment(&mut self) {
        self.state.viewer = None;
    }

    // ============================================================
    // Helpers
    // ============================================================

    /// On success the section's list and the dashboard are re-fetched; on
    /// failure nothing is re-fetched.
    async fn after_mutation(&mut self, section: Section, result: Result<(), ApiError>) -> ActionResult<()> {
        match result {
            Ok(()) => {
                self.state.notices.remove(&section);
                self.reload_with_dashboard(section).await;
                Ok(())
            }
            Err(err) => Err(self.fail(section, err.into())),
        }
    }

    async fn reload_with_dashboard(&mut self, section: Section) {
        let api = &self.api;
        let AppState {
            tasks,
            vocab,
            assignments,
            dashboard,
            ..
        } = &mut self.state;

        match section {
            Section::Tasks => {
                tokio::join!(tasks.load_with(api.list_tasks()), dashboard.load_with(api.dashboard()));
            }
            Section::Vocab => {
                tokio::join!(vocab.load_with(api.list_vocab()), dashboard.load_with(api.dashboard()));
            }
            Section::Assignments => {
                tokio::join!(
                    assignments.load_with(api.list_assignments()),
                    dashboard.load_with(api.dashboard())
                );
            }
            _ => {
                dashboard.load_with(api.dashboard()).await;
            }
        }
    }

    /// The section in front for the current session: the dashboard, the
    /// language picker, or the chosen auth pane.
    pub fn home_section(&self) -> Section {
        let session = &self.state.session;
        match (session.authenticated, session.has_language()) {
            (true, true) => Section::Dashboard,
            (true, false) => Section::LanguageSelection,
            (false, _) => self.state.auth_pane.section(),
        }
    }

    fn notify(&mut self, section: Section, text: &str) {
        self.state.notices.insert(
            section,
            Notice {
                text: text.to_string(),
                is_error: false,
            },
        );
    }

    fn fail(&mut self, section: Section, err: ActionError) -> ActionError {
        self.state.notices.insert(
            section,
            Notice {
                text: err.to_string(),
                is_error: true,
            },
        );
        err
    }
}
