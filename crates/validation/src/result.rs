//! Uniform validation result shared by every form.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key for whole-form failures.
pub const FORM_ERROR_KEY: &str = "form";

/// Dotted field path → message. At most one message per path: the first one
/// recorded wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `path` unless the path already has one.
    ///
    /// Returns whether the message was kept.
    pub fn insert_first(&mut self, path: impl Into<String>, message: impl Into<String>) -> bool {
        let path = path.into();
        if self.0.contains_key(&path) {
            return false;
        }
        self.0.insert(path, message.into());
        true
    }

    /// Record a whole-form failure.
    pub fn set_form(&mut self, message: impl Into<String>) -> bool {
        self.insert_first(FORM_ERROR_KEY, message)
    }

    pub fn form(&self) -> Option<&str> {
        self.get(FORM_ERROR_KEY)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn from_form(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.set_form(message);
        errors
    }
}

/// `{success, data, errors}`; never both data and errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormValidation {
    success: bool,
    data: Option<Map<String, Value>>,
    errors: FieldErrors,
}

impl FormValidation {
    pub fn valid(data: Map<String, Value>) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: FieldErrors::new(),
        }
    }

    /// A failed validation. An empty error map still reports one form-level
    /// error so callers always have something to display.
    pub fn invalid(mut errors: FieldErrors) -> Self {
        if errors.is_empty() {
            errors.set_form("Validation failed");
        }
        Self {
            success: false,
            data: None,
            errors,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_result(self) -> Result<Map<String, Value>, FieldErrors> {
        match self.data {
            Some(data) if self.success => Ok(data),
            _ => Err(self.errors),
        }
    }

    /// Deserialize the validated data into a typed form.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, FieldErrors> {
        let data = self.into_result()?;
        serde_json::from_value(Value::Object(data))
            .map_err(|e| FieldErrors::from_form(format!("unexpected form shape: {e}")))
    }
}
