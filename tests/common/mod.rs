//! In-process mock of the learning backend.
//!
//! Serves the same JSON surface as the real server on an ephemeral port, keeps
//! its data in memory and records every request line so tests can assert on
//! what the client sent.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use lingo_client::api::ApiClient;
use lingo_client::app::App;
use lingo_client::config::Config;

pub const USERNAME: &str = "ana";
pub const PASSWORD: &str = "secret123";

const TODAY: &str = "2024-04-30";
const SESSION_COOKIE: &str = "session";

pub type Shared = Arc<Mutex<MockState>>;

#[derive(Debug, Clone)]
pub struct MockUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub preferred_language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MockAssignment {
    pub id: i64,
    pub title: String,
    pub kind: String,
    pub language: String,
    pub questions: Value,
    pub answers: BTreeMap<String, String>,
    pub is_completed: bool,
    pub score: Option<f64>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub users: Vec<MockUser>,
    pub sessions: HashMap<String, String>,
    pub tasks: Vec<Value>,
    pub vocab: Vec<Value>,
    pub assignments: Vec<MockAssignment>,
    pub next_id: i64,
    /// `"METHOD /path"` for every request received, in order.
    pub requests: Vec<String>,
    pub last_vocab_body: Option<Value>,
    /// Paths answered with a bare 500 and a non-JSON body.
    pub failing: HashSet<String>,
}

impl MockState {
    pub fn with_user(preferred_language: Option<&str>) -> Self {
        Self {
            users: vec![MockUser {
                username: USERNAME.to_string(),
                email: "ana@example.com".to_string(),
                password: PASSWORD.to_string(),
                preferred_language: preferred_language.map(str::to_string),
            }],
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn count(&self, request_line: &str) -> usize {
        self.requests.iter().filter(|line| *line == request_line).count()
    }

    pub fn count_method(&self, method: &str) -> usize {
        let prefix = format!("{method} ");
        self.requests.iter().filter(|line| line.starts_with(&prefix)).count()
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<usize> {
        let token = session_token(headers)?;
        let username = self.sessions.get(&token)?;
        self.users.iter().position(|user| &user.username == username)
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start(state: MockState) -> Self {
        let state: Shared = Arc::new(Mutex::new(state));
        let router = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn app(&self) -> App {
        let config = Config::default().with_api_url(&self.base_url);
        App::new(ApiClient::new(&config).unwrap())
    }

    /// An app that is already signed in, with every view loaded.
    pub async fn signed_in_app(&self) -> App {
        let mut app = self.app();
        app.login(USERNAME, PASSWORD).await.unwrap();
        app
    }
}

/// Port that nothing listens on.
pub fn unreachable_app() -> App {
    let config = Config::default().with_api_url("http://127.0.0.1:9");
    App::new(ApiClient::new(&config).unwrap())
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/me", get(me))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/set-language", post(set_language))
        .route("/api/tasks/", get(list_tasks).post(create_task))
        .route("/api/tasks/:id", patch(update_task).delete(delete_task))
        .route("/api/vocab/", get(list_vocab).post(add_vocab))
        .route("/api/vocab/quiz", get(quiz))
        .route("/api/analytics/dashboard", get(dashboard))
        .route("/api/assignments/", get(list_assignments))
        .route("/api/assignments/generate", post(generate_assignment))
        .route("/api/assignments/:id", get(get_assignment))
        .route("/api/assignments/:id/submit", post(submit_assignment))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let failing = {
        let mut state = state.lock();
        state.requests.push(format!("{} {}", request.method(), path));
        state.failing.contains(&path)
    };
    if failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Authentication required")
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn start_session(state: &mut MockState, username: &str) -> String {
    let token = format!("tok-{}", state.next_id());
    state.sessions.insert(token.clone(), username.to_string());
    token
}

fn with_cookie(token: &str, status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly"))],
        Json(body),
    )
        .into_response()
}

fn text(body: &Value, key: &str) -> String {
    body.get(key).and_then(Value::as_str).unwrap_or("").trim().to_string()
}

// ============================================================
// Auth
// ============================================================

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock();
    match state.user_for(&headers) {
        Some(i) => {
            let user = &state.users[i];
            Json(json!({
                "authenticated": true,
                "user": {
                    "id": i as i64 + 1,
                    "username": user.username,
                    "email": user.email,
                    "preferred_language": user.preferred_language,
                }
            }))
            .into_response()
        }
        None => Json(json!({ "authenticated": false })).into_response(),
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();
    let username = text(&body, "username");
    let password = body.get("password").and_then(Value::as_str).unwrap_or("");

    let known = state
        .users
        .iter()
        .any(|user| user.username == username && user.password == password);
    if !known {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let token = start_session(&mut state, &username);
    with_cookie(&token, StatusCode::OK, json!({ "message": "Logged in successfully" }))
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();
    let username = text(&body, "username");
    let email = text(&body, "email");
    let password = text(&body, "password");

    if state.users.iter().any(|user| user.username == username) {
        return error(StatusCode::BAD_REQUEST, "Username already exists");
    }
    state.users.push(MockUser {
        username: username.clone(),
        email,
        password,
        preferred_language: None,
    });

    let token = start_session(&mut state, &username);
    with_cookie(&token, StatusCode::CREATED, json!({ "message": "User registered successfully" }))
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }
    Json(json!({ "message": "Logged out successfully" })).into_response()
}

async fn set_language(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();
    let Some(i) = state.user_for(&headers) else {
        return unauthorized();
    };
    let language = text(&body, "language");
    if !(2..=3).contains(&language.len()) {
        return error(StatusCode::BAD_REQUEST, "Invalid language code");
    }
    state.users[i].preferred_language = Some(language.clone());
    Json(json!({ "message": "Language preference updated", "language": language })).into_response()
}

// ============================================================
// Tasks
// ============================================================

async fn list_tasks(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    Json(Value::Array(state.tasks.clone())).into_response()
}

async fn create_task(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    let name = text(&body, "name");
    if name.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Task name required");
    }
    let id = state.next_id();
    state.tasks.push(json!({
        "id": id,
        "name": name,
        "due_date": body.get("due_date").cloned().unwrap_or(Value::Null),
        "is_completed": false,
        "created_at": TODAY,
    }));
    (StatusCode::CREATED, Json(json!({ "message": "Task created", "id": id }))).into_response()
}

async fn update_task(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    let Some(task) = state.tasks.iter_mut().find(|task| task["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Task not found");
    };
    for key in ["name", "due_date", "is_completed"] {
        if let Some(value) = body.get(key) {
            task[key] = value.clone();
        }
    }
    Json(json!({ "message": "Task updated" })).into_response()
}

async fn delete_task(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let mut state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    let before = state.tasks.len();
    state.tasks.retain(|task| task["id"] != id);
    if state.tasks.len() == before {
        return error(StatusCode::NOT_FOUND, "Task not found");
    }
    Json(json!({ "message": "Task deleted" })).into_response()
}

// ============================================================
// Vocabulary
// ============================================================

fn translate(word: &str, language: &str) -> String {
    let known = match (word.to_lowercase().as_str(), language) {
        ("hello", "es") => Some("hola"),
        ("bye", "es") => Some("adios"),
        ("cat", "es") => Some("gato"),
        ("house", "es") => Some("casa"),
        ("casa", "es") => Some("casa"),
        ("hello", "fr") => Some("bonjour"),
        _ => None,
    };
    known.map(str::to_string).unwrap_or_else(|| word.to_string())
}

async fn list_vocab(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    Json(Value::Array(state.vocab.clone())).into_response()
}

async fn add_vocab(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    state.last_vocab_body = Some(body.clone());

    let source_word = text(&body, "source_word");
    let target_language = text(&body, "target_language");
    if source_word.is_empty() || target_language.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Source word and target language required");
    }

    let translated = translate(&source_word, &target_language);
    let id = state.next_id();
    state.vocab.push(json!({
        "id": id,
        "source_word": source_word,
        "translated_word": translated,
        "target_language": target_language,
        "created_at": TODAY,
    }));
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Word added", "id": id, "translated": translated })),
    )
        .into_response()
}

async fn quiz(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    let questions: Vec<Value> = state
        .vocab
        .iter()
        .take(5)
        .map(|entry| {
            json!({
                "id": entry["id"],
                "source_word": entry["source_word"],
                "target_language": entry["target_language"],
                "answer": entry["translated_word"],
            })
        })
        .collect();
    Json(json!({ "questions": questions })).into_response()
}

// ============================================================
// Analytics
// ============================================================

async fn dashboard(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }

    let total = state.tasks.len();
    let completed = state.tasks.iter().filter(|task| task["is_completed"] == true).count();
    let upcoming: Vec<Value> = state
        .tasks
        .iter()
        .filter(|task| task["is_completed"] == false && !task["due_date"].is_null())
        .map(|task| json!({ "id": task["id"], "name": task["name"], "due_date": task["due_date"] }))
        .collect();

    let mut by_language: BTreeMap<String, u32> = BTreeMap::new();
    for entry in &state.vocab {
        let lang = entry["target_language"].as_str().unwrap_or("").to_string();
        *by_language.entry(lang).or_default() += 1;
    }

    let languages_studied = by_language.len();

    let mut created_over_time = BTreeMap::new();
    if total > 0 {
        created_over_time.insert(TODAY, total);
    }
    let mut learned_over_time = BTreeMap::new();
    if !state.vocab.is_empty() {
        learned_over_time.insert(TODAY, state.vocab.len());
    }

    Json(json!({
        "tasks": {
            "completion": { "completed": completed, "pending": total - completed, "total": total },
            "created_over_time": created_over_time,
            "upcoming": upcoming,
        },
        "vocabulary": {
            "total": state.vocab.len(),
            "by_language": by_language,
            "learned_over_time": learned_over_time,
        },
        "summary": {
            "total_tasks": total,
            "completed_tasks": completed,
            "total_vocab_words": state.vocab.len(),
            "languages_studied": languages_studied,
        }
    }))
    .into_response()
}

// ============================================================
// Assignments
// ============================================================

fn summary(assignment: &MockAssignment) -> Value {
    json!({
        "id": assignment.id,
        "title": assignment.title,
        "description": format!("Practice {} words", assignment.language),
        "type": assignment.kind,
        "language": assignment.language,
        "is_completed": assignment.is_completed,
        "score": assignment.score,
        "created_at": TODAY,
        "completed_at": if assignment.is_completed { Value::from(TODAY) } else { Value::Null },
    })
}

async fn list_assignments(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    Json(Value::Array(state.assignments.iter().map(summary).collect())).into_response()
}

async fn generate_assignment(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();
    let Some(i) = state.user_for(&headers) else {
        return unauthorized();
    };
    let kind = body.get("type").and_then(Value::as_str).unwrap_or("basic").to_string();
    let language = body
        .get("language")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| state.users[i].preferred_language.clone())
        .unwrap_or_else(|| "es".to_string());

    let words: Vec<(String, String)> = state
        .vocab
        .iter()
        .filter(|entry| entry["target_language"] == language.as_str())
        .map(|entry| {
            (
                entry["source_word"].as_str().unwrap_or("").to_string(),
                entry["translated_word"].as_str().unwrap_or("").to_string(),
            )
        })
        .collect();

    if kind != "basic" && words.len() < 3 {
        return error(
            StatusCode::BAD_REQUEST,
            &format!(
                "Not enough vocabulary words. Add at least 3 words in {} to generate assignments.",
                language.to_uppercase()
            ),
        );
    }

    let mut questions = serde_json::Map::new();
    let mut answers = BTreeMap::new();
    if kind == "basic" {
        questions.insert("1".into(), json!({ "question": "Translate \"hello\"" }));
        questions.insert("2".into(), json!({ "question": "Translate \"cat\"" }));
        answers.insert("1".into(), translate("hello", &language));
        answers.insert("2".into(), translate("cat", &language));
    } else {
        for (n, (source, translated)) in words.iter().take(3).enumerate() {
            let id = (n + 1).to_string();
            if kind == "multiple_choice" {
                let options: Vec<&str> = words.iter().take(3).map(|(_, t)| t.as_str()).collect();
                questions.insert(id.clone(), json!({ "question": format!("Pick \"{source}\""), "options": options }));
                answers.insert(id, n.to_string());
            } else {
                questions.insert(id.clone(), json!({ "question": format!("Translate \"{source}\"") }));
                answers.insert(id, translated.clone());
            }
        }
    }

    let id = state.next_id();
    let title = format!("{} practice", kind.replace('_', " "));
    let content = json!({ "questions": questions, "answers": answers });
    state.assignments.push(MockAssignment {
        id,
        title: title.clone(),
        kind: kind.clone(),
        language,
        questions: Value::Object(questions),
        answers,
        is_completed: false,
        score: None,
    });
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "title": title, "type": kind, "content": content })),
    )
        .into_response()
}

async fn get_assignment(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    let Some(assignment) = state.assignments.iter().find(|a| a.id == id) else {
        return error(StatusCode::NOT_FOUND, "Assignment not found");
    };
    let mut body = summary(assignment);
    body["content"] = json!({ "questions": assignment.questions, "answers": assignment.answers });
    Json(body).into_response()
}

async fn submit_assignment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock();
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    let Some(assignment) = state.assignments.iter_mut().find(|a| a.id == id) else {
        return error(StatusCode::NOT_FOUND, "Assignment not found");
    };
    if assignment.is_completed {
        return error(StatusCode::BAD_REQUEST, "Assignment already completed");
    }

    let given = body.get("answers").cloned().unwrap_or_default();
    let total = assignment.answers.len();
    let correct = assignment
        .answers
        .iter()
        .filter(|(qid, expected)| {
            given
                .get(qid.as_str())
                .and_then(Value::as_str)
                .is_some_and(|answer| answer.trim().eq_ignore_ascii_case(expected.trim()))
        })
        .count();
    let score = if total == 0 {
        0.0
    } else {
        (correct as f64 / total as f64 * 1000.0).round() / 10.0
    };
    let feedback = match score {
        s if s >= 90.0 => "Excellent work!",
        s if s >= 70.0 => "Good job! Keep practicing!",
        s if s >= 50.0 => "Not bad! Review and try again.",
        _ => "Keep practicing! You'll improve!",
    };

    assignment.is_completed = true;
    assignment.score = Some(score);
    Json(json!({
        "message": "Assignment submitted",
        "score": score,
        "correct": correct,
        "total": total,
        "feedback": feedback,
    }))
    .into_response()
}
