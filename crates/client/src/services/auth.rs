//! `/auth/*` endpoints.

use serde_json::{Value, json};

use learnhub_auth::UserRecord;
use learnhub_core::UserId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{AuthResponse, PasswordChange, RegisterRequest};

#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AuthApi<'_> {
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.client
            .post("/auth/login", &json!({ "email": email, "password": password }))
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        self.client.post("/auth/register", request).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.post_empty::<Value>("/auth/logout").await.map(drop)
    }

    pub async fn me(&self) -> Result<UserRecord, ApiError> {
        self.client.get("/auth/me").await
    }

    pub async fn update_user(&self, user_id: &UserId, patch: &Value) -> Result<Value, ApiError> {
        self.client.put(&format!("/auth/users/{user_id}"), patch).await
    }

    pub async fn change_password(
        &self,
        user_id: &UserId,
        change: &PasswordChange,
    ) -> Result<Value, ApiError> {
        self.client
            .put(&format!("/auth/users/{user_id}/password"), change)
            .await
    }

    pub async fn refresh_token(&self) -> Result<Value, ApiError> {
        self.client.post_empty("/auth/refresh").await
    }

    pub async fn verify_email(&self, token: &str) -> Result<Value, ApiError> {
        self.client
            .post("/auth/verify-email", &json!({ "token": token }))
            .await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<Value, ApiError> {
        self.client
            .post("/auth/resend-verification", &json!({ "email": email }))
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
        self.client
            .post("/auth/forgot-password", &json!({ "email": email }))
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<Value, ApiError> {
        self.client
            .post(
                "/auth/reset-password",
                &json!({ "token": token, "newPassword": new_password }),
            )
            .await
    }
}
