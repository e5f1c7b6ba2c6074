use crate::error::ApiError;
use crate::models::Dashboard;

use super::ApiClient;

impl ApiClient {
    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        self.get("/api/analytics/dashboard").await
    }
}
