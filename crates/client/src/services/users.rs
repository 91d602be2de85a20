//! `/users/*` endpoints.

use reqwest::multipart::Form;
use serde_json::Value;

use learnhub_auth::{Role, UserRecord};
use learnhub_core::{CertificateId, UserId, UserStatus};
use learnhub_validation::forms::ProfileForm;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{
    Certificate, Course, FileUpload, ListParams, Listing, RoleUpdate, StatusUpdate,
};

#[derive(Debug, Clone, Copy)]
pub struct UserApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl UserApi<'_> {
    pub async fn list(&self, params: &ListParams) -> Result<Listing<UserRecord>, ApiError> {
        self.client.get_with("/users", params).await
    }

    pub async fn get(&self, id: &UserId) -> Result<UserRecord, ApiError> {
        self.client.get(&format!("/users/{id}")).await
    }

    pub async fn profile(&self) -> Result<UserRecord, ApiError> {
        self.client.get("/users/profile").await
    }

    /// Returns the backend's view of the updated user (a JSON object).
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<Value, ApiError> {
        self.client.put("/users/profile", form).await
    }

    /// Multipart upload under the `avatar` field.
    pub async fn upload_avatar(&self, file: FileUpload) -> Result<Value, ApiError> {
        let form = Form::new().part("avatar", file.into_part()?);
        self.client.post_multipart("/users/profile/avatar", form).await
    }

    pub async fn enrolled_courses(&self, params: &ListParams) -> Result<Listing<Course>, ApiError> {
        self.client.get_with("/users/enrolled-courses", params).await
    }

    pub async fn learning_stats(&self) -> Result<Value, ApiError> {
        self.client.get("/users/learning-stats").await
    }

    pub async fn certificates(&self) -> Result<Listing<Certificate>, ApiError> {
        self.client.get("/users/certificates").await
    }

    /// The certificate document, as raw bytes (a PDF).
    pub async fn download_certificate(&self, id: &CertificateId) -> Result<Vec<u8>, ApiError> {
        self.client
            .get_bytes(&format!("/users/certificates/{id}/download"))
            .await
    }

    pub async fn update_role(&self, id: &UserId, role: Role) -> Result<UserRecord, ApiError> {
        self.client
            .put(&format!("/users/{id}/role"), &RoleUpdate { role })
            .await
    }

    pub async fn update_status(&self, id: &UserId, status: UserStatus) -> Result<UserRecord, ApiError> {
        self.client
            .put(&format!("/users/{id}/status"), &StatusUpdate { status })
            .await
    }

    pub async fn delete(&self, id: &UserId) -> Result<(), ApiError> {
        self.client
            .delete::<Value>(&format!("/users/{id}"))
            .await
            .map(drop)
    }
}
