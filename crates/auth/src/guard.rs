//! Navigation guard: render the requested view or redirect.
//!
//! - No IO
//! - No panics
//! - Fails closed: an unknown or missing role never satisfies a requirement

use crate::{Role, Session};

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Access policy attached to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Always renders; the session is not consulted.
    Unrestricted,

    /// Only for signed-out visitors (login, register).
    PublicOnly,

    /// Requires a signed-in session. A non-empty role list additionally
    /// requires the session role to be listed verbatim; an empty list admits
    /// any signed-in role.
    Protected(Vec<Role>),
}

impl RouteAccess {
    /// Any signed-in user, whatever the role.
    pub fn authenticated() -> Self {
        Self::Protected(Vec::new())
    }

    pub fn admin_only() -> Self {
        Self::Protected(vec![Role::ADMIN])
    }

    /// Instructor views. Admins are listed explicitly; there is no role
    /// hierarchy.
    pub fn instructor_area() -> Self {
        Self::Protected(vec![Role::INSTRUCTOR, Role::ADMIN])
    }

    /// Learner views, open to every platform role.
    pub fn user_area() -> Self {
        Self::Protected(vec![Role::USER, Role::INSTRUCTOR, Role::ADMIN])
    }
}

/// Why a navigation was redirected. Never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    Unauthenticated,
    RoleNotPermitted,
    AlreadyAuthenticated,
}

/// A redirect decision.
///
/// `replace` is always true for guard redirects: the redirect replaces the
/// history entry of the refused page so going back does not bounce again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
    pub replace: bool,
    pub reason: RedirectReason,
}

impl Redirect {
    fn replacing(to: &'static str, reason: RedirectReason) -> Self {
        Self {
            to,
            replace: true,
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GuardDecision::Render => None,
            GuardDecision::Redirect(r) => Some(r.to),
        }
    }
}

/// Decide whether `session` may see a route guarded by `access`.
pub fn guard(session: &Session, access: &RouteAccess) -> GuardDecision {
    match access {
        RouteAccess::Unrestricted => GuardDecision::Render,

        RouteAccess::PublicOnly => {
            if session.is_authenticated() {
                GuardDecision::Redirect(Redirect::replacing(
                    DASHBOARD_PATH,
                    RedirectReason::AlreadyAuthenticated,
                ))
            } else {
                GuardDecision::Render
            }
        }

        RouteAccess::Protected(required) => {
            if !session.is_authenticated() {
                return GuardDecision::Redirect(Redirect::replacing(
                    LOGIN_PATH,
                    RedirectReason::Unauthenticated,
                ));
            }

            let permitted = required.is_empty()
                || session.role().is_some_and(|role| required.contains(role));

            if permitted {
                GuardDecision::Render
            } else {
                tracing::debug!(
                    role = %session.role().map(Role::as_str).unwrap_or("none"),
                    "navigation refused: role not permitted"
                );
                GuardDecision::Redirect(Redirect::replacing(
                    LANDING_PATH,
                    RedirectReason::RoleNotPermitted,
                ))
            }
        }
    }
}
