use crate::api::ApiClient;
use crate::error::{ActionError, ActionResult};
use crate::models::{LoginRequest, MeResponse, RegisterRequest, SetLanguageRequest};

/// Client-side projection of the backend's view of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub username: Option<String>,
    pub preferred_language: Option<String>,
}

impl Session {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn has_language(&self) -> bool {
        self.authenticated && self.preferred_language.is_some()
    }

    pub fn from_me(me: MeResponse) -> Self {
        match me.user {
            Some(user) if me.authenticated => Self {
                authenticated: true,
                username: Some(user.username),
                preferred_language: user
                    .preferred_language
                    .map(|lang| lang.trim().to_lowercase())
                    .filter(|lang| !lang.is_empty()),
            },
            _ => Self::signed_out(),
        }
    }

    /// Probes `/api/me`. Any failure yields a signed-out session.
    pub async fn fetch(api: &ApiClient) -> Self {
        match api.me().await {
            Ok(me) => Self::from_me(me),
            Err(err) => {
                tracing::info!(error = %err, "session probe failed, treating as signed out");
                Self::signed_out()
            }
        }
    }
}

pub fn login_request(username: &str, password: &str) -> ActionResult<LoginRequest> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ActionError::validation("Please enter username and password"));
    }
    Ok(LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn register_request(username: &str, email: &str, password: &str) -> ActionResult<RegisterRequest> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ActionError::validation("Please fill in all fields"));
    }
    if username.chars().count() < 3 {
        return Err(ActionError::validation("Username must be at least 3 characters"));
    }
    if !email.contains('@') || !email.contains('.') {
        return Err(ActionError::validation("Please enter a valid email address"));
    }
    if password.chars().count() < 6 {
        return Err(ActionError::validation("Password must be at least 6 characters"));
    }

    Ok(RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Trimmed, lower-cased 2-3 letter code.
pub fn normalize_language(raw: &str) -> ActionResult<String> {
    let code = raw.trim().to_lowercase();
    let len = code.chars().count();
    if !(2..=3).contains(&len) || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ActionError::validation("Please enter a valid 2-3 character language code"));
    }
    Ok(code)
}

pub fn set_language_request(raw: &str) -> ActionResult<SetLanguageRequest> {
    Ok(SetLanguageRequest {
        language: normalize_language(raw)?,
    })
}
