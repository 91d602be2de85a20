//! Form submissions that touch the session: validate, submit, update store.
//!
//! Every flow reports failures in the same shape as validation: per-field
//! messages plus the reserved `form` slot for backend and network errors.

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Map, Value};
use thiserror::Error;

use learnhub_auth::guard::LOGIN_PATH;
use learnhub_auth::{SessionStore, UserRecord};
use learnhub_validation::forms::{
    self, ChangePasswordForm, LoginForm, ProfileForm, RegisterForm,
};
use learnhub_validation::{FieldErrors, validate_as};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{PasswordChange, RegisterRequest};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const PROFILE_UPDATE_FAILED: &str = "Profile update failed";
pub const PASSWORD_CHANGE_FAILED: &str = "Password change failed";
pub const SUBMISSION_IN_PROGRESS: &str = "A submission is already in progress";

/// Why a submission did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form submission failed")]
pub struct FormFailure {
    pub errors: FieldErrors,
    /// Set when the backend rejected the credential; the caller should navigate here.
    pub redirect_to: Option<&'static str>,
}

impl FormFailure {
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors::from_form(message),
            redirect_to: None,
        }
    }

    fn from_api(err: &ApiError, fallback: &str) -> Self {
        Self {
            errors: FieldErrors::from_form(err.user_message(fallback)),
            redirect_to: err.redirect_to(),
        }
    }

    pub fn form_message(&self) -> Option<&str> {
        self.errors.form()
    }

    pub fn field(&self, path: &str) -> Option<&str> {
        self.errors.get(path)
    }
}

impl From<FieldErrors> for FormFailure {
    fn from(errors: FieldErrors) -> Self {
        Self {
            errors,
            redirect_to: None,
        }
    }
}

/// Serializes submissions: at most one in flight per gate.
#[derive(Debug, Default)]
pub struct SubmitGate {
    busy: AtomicBool,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate; `None` while another submission holds it.
    pub fn try_enter(&self) -> Option<SubmitPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitPermit { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate on drop.
#[derive(Debug)]
pub struct SubmitPermit<'a> {
    gate: &'a SubmitGate,
}

impl Drop for SubmitPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct AuthFlow {
    client: ApiClient,
    gate: SubmitGate,
}

impl AuthFlow {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            gate: SubmitGate::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn is_submitting(&self) -> bool {
        self.gate.is_busy()
    }

    fn enter(&self) -> Result<SubmitPermit<'_>, FormFailure> {
        self.gate
            .try_enter()
            .ok_or_else(|| FormFailure::form(SUBMISSION_IN_PROGRESS))
    }

    /// Sign in and start the session.
    pub async fn login(&self, input: &Value) -> Result<UserRecord, FormFailure> {
        let form: LoginForm = validate_as(forms::login(), input).await?;
        let _permit = self.enter()?;

        let response = self
            .client
            .auth()
            .login(&form.email, &form.password)
            .await
            .map_err(|e| FormFailure::from_api(&e, LOGIN_FAILED))?;

        self.store().login(response.user.clone(), response.token);
        Ok(response.user)
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, input: &Value) -> Result<Value, FormFailure> {
        let form: RegisterForm = validate_as(forms::register(), input).await?;
        let _permit = self.enter()?;

        self.client
            .auth()
            .register(&RegisterRequest::from(form))
            .await
            .map_err(|e| FormFailure::from_api(&e, REGISTRATION_FAILED))
    }

    /// End the session. The local session is cleared even when the backend
    /// call fails.
    pub async fn logout(&self) {
        if let Err(err) = self.client.auth().logout().await {
            tracing::warn!(error = %err, "logout request failed; clearing session locally");
        }
        self.store().logout();
    }

    /// Save profile changes and merge the backend's answer into the session.
    pub async fn update_profile(&self, input: &Value) -> Result<UserRecord, FormFailure> {
        let form: ProfileForm = validate_as(forms::profile(), input).await?;
        if !self.store().is_authenticated() {
            return Err(FormFailure {
                errors: FieldErrors::from_form(PROFILE_UPDATE_FAILED),
                redirect_to: Some(LOGIN_PATH),
            });
        }
        let _permit = self.enter()?;

        let returned = self
            .client
            .users()
            .update_profile(&form)
            .await
            .map_err(|e| FormFailure::from_api(&e, PROFILE_UPDATE_FAILED))?;

        let patch = match returned {
            Value::Object(map) => map,
            _ => submitted_fields(&form),
        };
        self.store().update_profile(&patch).map_err(|e| {
            tracing::warn!(error = %e, "profile response could not be merged");
            FormFailure::form(PROFILE_UPDATE_FAILED)
        })?;

        self.store()
            .user()
            .ok_or_else(|| FormFailure::form(PROFILE_UPDATE_FAILED))
    }

    pub async fn change_password(&self, input: &Value) -> Result<(), FormFailure> {
        let form: ChangePasswordForm = validate_as(forms::change_password(), input).await?;
        let Some(user) = self.store().user() else {
            return Err(FormFailure {
                errors: FieldErrors::from_form(PASSWORD_CHANGE_FAILED),
                redirect_to: Some(LOGIN_PATH),
            });
        };
        let _permit = self.enter()?;

        self.client
            .auth()
            .change_password(&user.id, &PasswordChange::from(form))
            .await
            .map(drop)
            .map_err(|e| FormFailure::from_api(&e, PASSWORD_CHANGE_FAILED))
    }

    /// Re-read the signed-in user from the backend (startup bootstrap).
    ///
    /// Without a token nothing is requested.
    pub async fn refresh_current_user(&self) -> Result<UserRecord, ApiError> {
        if self.store().token().is_none() {
            return Err(ApiError::Unauthorized {
                redirect_to: LOGIN_PATH,
                message: None,
            });
        }

        let user = self.client.auth().me().await?;
        if self.store().refresh_user(user.clone()).is_err() {
            // Signed out while the request was in flight.
            return Err(ApiError::Unauthorized {
                redirect_to: LOGIN_PATH,
                message: None,
            });
        }
        Ok(user)
    }
}

fn submitted_fields(form: &ProfileForm) -> Map<String, Value> {
    match serde_json::to_value(form) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
