//! JSON-over-HTTP client for the learnhub backend.
//!
//! Every request carries the session's bearer token (when there is one) and a
//! fresh `X-Request-Id`. A 401 on any call clears the session before the
//! error reaches the caller.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use learnhub_auth::SessionStore;
use learnhub_auth::guard::LOGIN_PATH;

use crate::config::ClientConfig;
use crate::error::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    /// POST a multipart form (file uploads).
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path).multipart(form)).await
    }

    /// GET a binary body (certificate PDFs and similar downloads).
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string());

        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let bytes = self.execute(req).await?;

        // Empty bodies (204, bare 200) decode as JSON null.
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and return the raw success body. Error bodies are read only for
    /// their message; a body that cannot be read never masks the status.
    async fn execute(&self, req: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        let url = resp.url().path().to_string();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = %url, "backend rejected credentials; clearing session");
            self.session.clear_persisted();
            let body = resp.bytes().await.ok();
            return Err(ApiError::Unauthorized {
                redirect_to: LOGIN_PATH,
                message: body.as_deref().and_then(backend_message),
            });
        }

        if !status.is_success() {
            tracing::debug!(path = %url, status = status.as_u16(), "request failed");
            let body = resp.bytes().await.ok();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body.as_deref().and_then(backend_message),
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

/// The `message` field of a JSON error body, if any.
fn backend_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
