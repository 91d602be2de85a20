use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role tag carried on the user record and checked by the route guard.
///
/// Roles stay opaque strings so that a value the client does not know
/// (a newer backend role, a typo in storage) survives a round trip and simply
/// never matches a requirement. The vocabulary the platform ships with is
/// exposed as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const INSTRUCTOR: Role = Role(Cow::Borrowed("instructor"));
    pub const USER: Role = Role(Cow::Borrowed("user"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display label for the known roles; `None` for anything else.
    pub fn label(&self) -> Option<&'static str> {
        match self.as_str() {
            "admin" => Some("Admin"),
            "instructor" => Some("Instructor"),
            "user" => Some("Student"),
            _ => None,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
