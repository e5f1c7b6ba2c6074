use crate::error::ApiError;
use crate::models::{Assignment, AssignmentSummary, Created, GenerateRequest, SubmitRequest, SubmitResult};

use super::ApiClient;

const ASSIGNMENTS: &str = "/api/assignments/";

impl ApiClient {
    pub async fn list_assignments(&self) -> Result<Vec<AssignmentSummary>, ApiError> {
        self.get(ASSIGNMENTS).await
    }

    pub async fn generate_assignment(&self, request: &GenerateRequest) -> Result<Created, ApiError> {
        self.post("/api/assignments/generate", request).await
    }

    pub async fn get_assignment(&self, id: i64) -> Result<Assignment, ApiError> {
        self.get(&format!("{ASSIGNMENTS}{id}")).await
    }

    pub async fn submit_assignment(&self, id: i64, request: &SubmitRequest) -> Result<SubmitResult, ApiError> {
        self.post(&format!("{ASSIGNMENTS}{id}/submit"), request).await
    }
}
