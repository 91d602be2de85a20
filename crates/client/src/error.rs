//! Errors surfaced by the REST collaborator.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 401. The session has already been cleared; the caller should
    /// navigate to `redirect_to`.
    #[error("credentials rejected; redirect to {redirect_to}")]
    Unauthorized {
        redirect_to: &'static str,
        message: Option<String>,
    },

    /// Any other non-success status. `message` is the backend's `message`
    /// field when the body carried one.
    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// The string to show in a form's error slot: the backend message when
    /// there is one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Unauthorized {
                message: Some(m), ..
            }
            | ApiError::Api {
                message: Some(m), ..
            } => m.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn redirect_to(&self) -> Option<&'static str> {
        match self {
            ApiError::Unauthorized { redirect_to, .. } => Some(*redirect_to),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
