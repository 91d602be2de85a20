//! `/analytics/*` endpoints. Report shapes are backend-defined and returned
//! as raw JSON.

use serde_json::Value;

use learnhub_core::CourseId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::ReportRange;

#[derive(Debug, Clone, Copy)]
pub struct AnalyticsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AnalyticsApi<'_> {
    pub async fn instructor_stats(&self) -> Result<Value, ApiError> {
        self.client.get("/analytics/instructor/stats").await
    }

    pub async fn course(&self, id: &CourseId) -> Result<Value, ApiError> {
        self.client.get(&format!("/analytics/courses/{id}")).await
    }

    pub async fn engagement(&self, id: &CourseId, range: &ReportRange) -> Result<Value, ApiError> {
        self.client
            .get_with(&format!("/analytics/courses/{id}/engagement"), range)
            .await
    }

    pub async fn revenue(&self, range: &ReportRange) -> Result<Value, ApiError> {
        self.client.get_with("/analytics/revenue", range).await
    }

    pub async fn admin_stats(&self) -> Result<Value, ApiError> {
        self.client.get("/analytics/admin/stats").await
    }

    pub async fn platform_stats(&self) -> Result<Value, ApiError> {
        self.client.get("/analytics/platform/stats").await
    }

    pub async fn user_activity(&self, range: &ReportRange) -> Result<Value, ApiError> {
        self.client.get_with("/analytics/user-activity", range).await
    }
}
