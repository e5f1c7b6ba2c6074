use crate::error::ApiError;
use crate::models::{LoginRequest, MeResponse, RegisterRequest, SetLanguageRequest};

use super::ApiClient;

impl ApiClient {
    pub async fn me(&self) -> Result<MeResponse, ApiError> {
        self.get("/api/me").await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<serde_json::Value, ApiError> {
        self.post("/api/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, ApiError> {
        self.post("/api/auth/register", request).await
    }

    pub async fn logout(&self) -> Result<serde_json::Value, ApiError> {
        self.post("/api/auth/logout", &serde_json::json!({})).await
    }

    pub async fn set_language(&self, request: &SetLanguageRequest) -> Result<serde_json::Value, ApiError> {
        self.post("/api/auth/set-language", request).await
    }
}
