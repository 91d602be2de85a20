//! `learnhub-auth`: client-side session and navigation policy.
//!
//! This crate is intentionally decoupled from HTTP and rendering: it owns the
//! persisted session record and the pure decision of whether a navigation may
//! render or must redirect.

pub mod guard;
pub mod roles;
pub mod routes;
pub mod session;
pub mod storage;
pub mod store;

pub use guard::{GuardDecision, Redirect, RedirectReason, RouteAccess, guard};
pub use roles::Role;
pub use routes::{Navigation, RouteMatch, RouteTable, View};
pub use session::{Session, UserRecord};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::{SESSION_STORAGE_KEY, SessionError, SessionStore};
