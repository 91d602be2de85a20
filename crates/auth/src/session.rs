//! The session record: who is using the client right now.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use learnhub_core::UserId;

use crate::Role;

/// User record as returned by the backend on login / `GET /auth/me`.
///
/// Only the fields the client reasons about are typed; everything else the
/// backend sends (phone, bio, specialization, ...) is kept in `profile` and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    /// Missing on malformed records; a session without a role fails every
    /// role requirement.
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl UserRecord {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: email.into(),
            role: Some(role),
            avatar: None,
            profile: Map::new(),
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Shallow-merge `patch` over this record (top-level keys replace).
    ///
    /// The merged object must still be a valid user record; on failure `self`
    /// is left untouched.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut object = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            object.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(object))
    }
}

/// Snapshot of the client session.
///
/// `user`, `token` and `is_authenticated` always agree on a session produced
/// by [`crate::SessionStore`]'s `login`/`logout`/`update_profile`: either all
/// three are set or none is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub(crate) user: Option<UserRecord>,
    #[serde(default)]
    pub(crate) token: Option<String>,
    #[serde(default)]
    pub(crate) is_authenticated: bool,
    #[serde(default)]
    pub(crate) role: Option<Role>,
}

impl Session {
    /// The canonical signed-out session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A consistent signed-in session for `user`.
    pub fn signed_in(user: UserRecord, token: impl Into<String>) -> Self {
        Self {
            role: user.role.clone(),
            user: Some(user),
            token: Some(token.into()),
            is_authenticated: true,
        }
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Whether user, token and the authenticated flag agree, and the cached
    /// role is the user record's role.
    pub fn is_consistent(&self) -> bool {
        let role_matches = match &self.user {
            Some(user) => user.role == self.role,
            None => self.role.is_none(),
        };
        self.token.is_some() == self.is_authenticated
            && self.is_authenticated == self.user.is_some()
            && role_matches
    }
}
