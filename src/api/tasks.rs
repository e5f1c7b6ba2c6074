use reqwest::Method;

use crate::error::ApiError;
use crate::models::{Created, NewTask, Task, TaskPatch};

use super::ApiClient;

const TASKS: &str = "/api/tasks/";

impl ApiClient {
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.get(TASKS).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Created, ApiError> {
        self.post(TASKS, task).await
    }

    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<serde_json::Value, ApiError> {
        self.call(Method::PATCH, &format!("{TASKS}{id}"), Some(patch)).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.call::<(), _>(Method::DELETE, &format!("{TASKS}{id}"), None).await
    }
}
