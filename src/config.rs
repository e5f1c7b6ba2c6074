use std::time::Duration;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = std::env::var("LINGO_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_ms = std::env::var("LINGO_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());

        Self {
            api_url: normalize_api_url(&api_url),
            timeout: Duration::from_millis(timeout_ms),
            log_level,
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_api_url(api_url);
        self
    }

    pub fn with_log_level(mut self, log_level: &str) -> Self {
        self.log_level = log_level.to_string();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            log_level: "warn".to_string(),
        }
    }
}

fn normalize_api_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
