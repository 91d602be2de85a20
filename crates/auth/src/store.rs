//! The session store: single authoritative, persisted session.
//!
//! Any component may read the session at any time; writes go exclusively
//! through the operations below so the user/token/authenticated triple never
//! disagrees. Every mutation is written through to storage under
//! [`SESSION_STORAGE_KEY`]; storage failures are logged and never fail the
//! mutation or startup.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::storage::{MemoryStorage, SessionStorage};
use crate::{Role, Session, UserRecord};

/// Storage key holding the serialized session.
pub const SESSION_STORAGE_KEY: &str = "auth-store";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no signed-in user to update")]
    NotAuthenticated,

    #[error("profile update rejected: {0}")]
    InvalidProfile(String),
}

/// On-disk envelope: `{"state": {user, token, isAuthenticated, role}}`.
#[derive(Serialize, Deserialize)]
struct Persisted {
    state: Session,
}

pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn SessionStorage>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("is_authenticated", &self.is_authenticated())
            .field("role", &self.role())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Restore the session from `storage`.
    ///
    /// Absent, unreadable, unparseable or self-contradictory data yields the
    /// empty session.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let session = load(storage.as_ref());
        Self {
            state: RwLock::new(session),
            storage,
        }
    }

    /// A store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::restore(Arc::new(MemoryStorage::new()))
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.read().role.clone()
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.read().user.clone()
    }

    /// Record a successful authentication.
    ///
    /// Called after the backend accepted the credentials; performs no IO
    /// besides persistence.
    pub fn login(&self, user: UserRecord, token: impl Into<String>) {
        let next = Session::signed_in(user, token);
        tracing::info!(
            user_id = %next.user.as_ref().map(|u| u.id.to_string()).unwrap_or_default(),
            role = %next.role.as_ref().map(Role::as_str).unwrap_or("none"),
            "session started"
        );
        self.replace(next);
    }

    /// Drop the session. Always succeeds and is idempotent.
    pub fn logout(&self) {
        let was_authenticated = self.is_authenticated();
        self.replace(Session::empty());
        if was_authenticated {
            tracing::info!("session ended");
        }
    }

    /// Shallow-merge `patch` into the signed-in user.
    ///
    /// Token and authenticated flag are untouched; the cached role follows the
    /// merged record, so a patch that changes `role` changes the session role.
    pub fn update_profile(&self, patch: &Map<String, Value>) -> Result<(), SessionError> {
        let mut state = self.write();
        let current = state.user.as_ref().ok_or(SessionError::NotAuthenticated)?;
        let merged = current
            .merged(patch)
            .map_err(|e| SessionError::InvalidProfile(e.to_string()))?;

        if merged.role != state.role {
            tracing::info!(
                role = %merged.role.as_ref().map(Role::as_str).unwrap_or("none"),
                "session role changed by profile update"
            );
        }
        state.role = merged.role.clone();
        state.user = Some(merged);
        self.persist(&state);
        Ok(())
    }

    /// Replace the signed-in user with a fresh copy from the backend and
    /// re-derive the role, in one write.
    ///
    /// Token and authenticated flag are untouched.
    pub fn refresh_user(&self, user: UserRecord) -> Result<(), SessionError> {
        let mut state = self.write();
        if !state.is_authenticated {
            return Err(SessionError::NotAuthenticated);
        }
        state.role = user.role.clone();
        state.user = Some(user);
        self.persist(&state);
        Ok(())
    }

    /// Raw setter for bootstrap/refresh flows.
    ///
    /// Callers must keep user, token and the authenticated flag in agreement;
    /// this setter does not touch the other two.
    pub fn set_user(&self, user: Option<UserRecord>) {
        let mut state = self.write();
        state.user = user;
        self.persist(&state);
    }

    /// Raw setter for token refresh. Same caller contract as [`Self::set_user`].
    pub fn set_token(&self, token: Option<String>) {
        let mut state = self.write();
        state.token = token;
        self.persist(&state);
    }

    /// Raw setter for the cached role. Same caller contract as [`Self::set_user`].
    pub fn set_role(&self, role: Option<Role>) {
        let mut state = self.write();
        state.role = role;
        self.persist(&state);
    }

    /// Forget the session and delete the persisted copy.
    ///
    /// Used when the backend rejects the credential (HTTP 401).
    pub fn clear_persisted(&self) {
        let mut state = self.write();
        *state = Session::empty();
        if let Err(err) = self.storage.remove(SESSION_STORAGE_KEY) {
            tracing::warn!(error = %err, "failed to remove persisted session");
        }
        tracing::info!("session cleared after credential rejection");
    }

    fn replace(&self, next: Session) {
        let mut state = self.write();
        *state = next;
        self.persist(&state);
    }

    fn persist(&self, session: &Session) {
        let payload = Persisted {
            state: session.clone(),
        };
        let encoded = match serde_json::to_string(&payload) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode session");
                return;
            }
        };
        if let Err(err) = self.storage.write(SESSION_STORAGE_KEY, &encoded) {
            tracing::warn!(error = %err, "failed to persist session");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load(storage: &dyn SessionStorage) -> Session {
    let raw = match storage.read(SESSION_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Session::empty(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read persisted session");
            return Session::empty();
        }
    };

    let session = match serde_json::from_str::<Persisted>(&raw) {
        Ok(persisted) => persisted.state,
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable persisted session");
            return Session::empty();
        }
    };

    // Includes a cached role that disagrees with the user record.
    if !session.is_consistent() {
        tracing::warn!("discarding inconsistent persisted session");
        return Session::empty();
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::storage::StorageError;

    fn student() -> UserRecord {
        UserRecord::new("7", "sam@example.com", Role::USER).with_name("Sam", "Lee")
    }

    fn store_with(storage: Arc<MemoryStorage>) -> SessionStore {
        SessionStore::restore(storage)
    }

    #[test]
    fn login_sets_all_four_fields() {
        let store = SessionStore::in_memory();
        store.login(student(), "tok-1");

        let session = store.snapshot();
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(session.role(), Some(&Role::USER));
        assert_eq!(session.user().map(|u| u.email.as_str()), Some("sam@example.com"));
    }

    #[test]
    fn logout_twice_equals_logout_once() {
        let store = SessionStore::in_memory();
        store.login(student(), "tok-1");

        store.logout();
        let once = store.snapshot();
        store.logout();
        let twice = store.snapshot();

        assert_eq!(once, Session::empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn session_survives_restart() {
        let storage = Arc::new(MemoryStorage::new());
        let before = {
            let store = store_with(storage.clone());
            store.login(student(), "tok-1");
            store.snapshot()
        };

        let restored = store_with(storage).snapshot();
        assert_eq!(restored, before);
    }

    #[test]
    fn persisted_format_wraps_state() {
        let storage = Arc::new(MemoryStorage::new());
        store_with(storage.clone()).login(student(), "tok-1");

        let raw = storage.read(SESSION_STORAGE_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["state"]["token"], "tok-1");
        assert_eq!(value["state"]["isAuthenticated"], true);
        assert_eq!(value["state"]["user"]["firstName"], "Sam");
    }

    #[test]
    fn corrupt_storage_restores_empty_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(SESSION_STORAGE_KEY, "{not json").unwrap();
        assert_eq!(store_with(storage).snapshot(), Session::empty());
    }

    #[test]
    fn contradictory_storage_restores_empty_session() {
        let storage = Arc::new(MemoryStorage::new());
        let forged = json!({ "state": { "user": null, "token": null, "isAuthenticated": true, "role": "admin" } });
        storage.write(SESSION_STORAGE_KEY, &forged.to_string()).unwrap();

        let session = store_with(storage).snapshot();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn role_contradicting_user_record_restores_empty_session() {
        let storage = Arc::new(MemoryStorage::new());
        let forged = json!({
            "state": {
                "user": { "id": 7, "email": "sam@example.com", "role": "user" },
                "token": "t",
                "isAuthenticated": true,
                "role": "admin"
            }
        });
        storage.write(SESSION_STORAGE_KEY, &forged.to_string()).unwrap();

        let session = store_with(storage).snapshot();
        assert_eq!(session, Session::empty());
        assert!(!crate::guard(&session, &crate::RouteAccess::admin_only()).is_render());
    }

    #[test]
    fn raw_role_drift_does_not_survive_restart() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage.clone());
        store.login(student(), "tok-1");
        store.set_role(Some(Role::ADMIN));

        let restored = store_with(storage).snapshot();
        assert!(!restored.is_authenticated());
        assert_eq!(restored.role(), None);
    }

    #[test]
    fn refresh_user_rederives_role_in_one_step() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage.clone());
        store.login(student(), "tok-1");

        let promoted = UserRecord::new("7", "sam@example.com", Role::INSTRUCTOR);
        store.refresh_user(promoted).unwrap();

        let session = store.snapshot();
        assert!(session.is_consistent());
        assert_eq!(session.role(), Some(&Role::INSTRUCTOR));
        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(store_with(storage).snapshot(), session);
    }

    #[test]
    fn refresh_user_requires_a_session() {
        let store = SessionStore::in_memory();
        assert_eq!(
            store.refresh_user(student()),
            Err(SessionError::NotAuthenticated)
        );
        assert_eq!(store.snapshot(), Session::empty());
    }

    #[test]
    fn extra_envelope_fields_are_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        let raw = json!({
            "state": {
                "user": { "id": 3, "email": "a@b.co", "role": "admin" },
                "token": "t",
                "isAuthenticated": true,
                "role": "admin"
            },
            "version": 0
        });
        storage.write(SESSION_STORAGE_KEY, &raw.to_string()).unwrap();

        let session = store_with(storage).snapshot();
        assert_eq!(session.role(), Some(&Role::ADMIN));
    }

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    #[test]
    fn storage_failures_never_block_mutations() {
        let store = SessionStore::restore(Arc::new(FailingStorage));
        assert!(!store.is_authenticated());

        store.login(student(), "tok-1");
        assert!(store.is_authenticated());

        store.clear_persisted();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn update_profile_keeps_credentials() {
        let store = SessionStore::in_memory();
        store.login(student(), "tok-1");

        let patch = json!({ "firstName": "Samuel", "bio": "hi" });
        store.update_profile(patch.as_object().unwrap()).unwrap();

        let session = store.snapshot();
        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(session.role(), Some(&Role::USER));
        assert_eq!(session.user().unwrap().first_name, "Samuel");
        assert_eq!(session.user().unwrap().last_name, "Lee");
    }

    #[test]
    fn update_profile_rederives_role() {
        let store = SessionStore::in_memory();
        store.login(student(), "tok-1");

        let patch = json!({ "role": "instructor" });
        store.update_profile(patch.as_object().unwrap()).unwrap();
        assert_eq!(store.role(), Some(Role::INSTRUCTOR));
    }

    #[test]
    fn update_profile_requires_a_user() {
        let store = SessionStore::in_memory();
        let patch = json!({ "firstName": "Ghost" });
        assert_eq!(
            store.update_profile(patch.as_object().unwrap()),
            Err(SessionError::NotAuthenticated)
        );
        assert!(store.snapshot().is_consistent());
    }

    #[test]
    fn rejected_patch_leaves_session_untouched() {
        let store = SessionStore::in_memory();
        store.login(student(), "tok-1");
        let before = store.snapshot();

        let patch = json!({ "email": ["not", "a", "string"] });
        assert!(matches!(
            store.update_profile(patch.as_object().unwrap()),
            Err(SessionError::InvalidProfile(_))
        ));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn clear_persisted_removes_the_key() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage.clone());
        store.login(student(), "tok-1");

        store.clear_persisted();
        assert_eq!(storage.read(SESSION_STORAGE_KEY).unwrap(), None);
        assert_eq!(store_with(storage).snapshot(), Session::empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Login(String, u8),
            Logout,
            Patch(Option<u8>, String),
            Refresh(u8),
        }

        fn role_for(n: u8) -> Role {
            match n % 4 {
                0 => Role::ADMIN,
                1 => Role::INSTRUCTOR,
                2 => Role::USER,
                _ => Role::new("auditor"),
            }
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                ("[a-z0-9]{1,12}", any::<u8>()).prop_map(|(t, r)| Op::Login(t, r)),
                Just(Op::Logout),
                (proptest::option::of(any::<u8>()), "[A-Za-z]{0,8}")
                    .prop_map(|(r, name)| Op::Patch(r, name)),
                any::<u8>().prop_map(Op::Refresh),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: user, token and the authenticated flag agree after every operation,
            /// and the cached role follows the user record.
            #[test]
            fn tri_state_invariant_holds(ops in proptest::collection::vec(op(), 0..32)) {
                let storage = Arc::new(MemoryStorage::new());
                let store = SessionStore::restore(storage.clone());

                for op in ops {
                    match op {
                        Op::Login(token, r) => {
                            store.login(UserRecord::new("1", "p@example.com", role_for(r)), token);
                        }
                        Op::Logout => store.logout(),
                        Op::Patch(role, name) => {
                            let mut patch = Map::new();
                            patch.insert("firstName".into(), Value::String(name));
                            if let Some(r) = role {
                                patch.insert("role".into(), Value::String(role_for(r).to_string()));
                            }
                            let _ = store.update_profile(&patch);
                        }
                        Op::Refresh(r) => {
                            let _ = store.refresh_user(UserRecord::new("1", "p@example.com", role_for(r)));
                        }
                    }

                    let session = store.snapshot();
                    prop_assert!(session.is_consistent());
                    let user_role = session.user().and_then(|u| u.role.clone());
                    prop_assert_eq!(session.role().cloned(), user_role);

                    let restored = SessionStore::restore(storage.clone()).snapshot();
                    prop_assert_eq!(restored, session);
                }
            }
        }
    }
}
