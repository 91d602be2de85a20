//! Static routing table and guarded navigation.

use std::collections::BTreeMap;

use crate::guard::{GuardDecision, Redirect, RouteAccess, guard};
use crate::Session;

/// Views the client can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Landing,
    Login,
    Register,
    CourseList,
    CourseDetail,
    CourseLearn,
    UserDashboard,
    AdminDashboard,
    InstructorDashboard,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteDef {
    pattern: &'static str,
    view: View,
    access: RouteAccess,
}

/// A path resolved against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub view: View,
    pub access: RouteAccess,
    /// Values captured by `:name` segments.
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(RouteMatch),
    Redirect(Redirect),
}

/// Ordered routing table; the first matching pattern wins and unmatched paths
/// resolve to [`View::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RouteTable {
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// The platform's routes.
    pub fn standard() -> Self {
        Self::empty()
            .route("/", View::Landing, RouteAccess::Unrestricted)
            .route("/login", View::Login, RouteAccess::PublicOnly)
            .route("/register", View::Register, RouteAccess::PublicOnly)
            .route("/courses", View::CourseList, RouteAccess::Unrestricted)
            .route("/courses/:courseId", View::CourseDetail, RouteAccess::Unrestricted)
            .route("/courses/:courseId/learn", View::CourseLearn, RouteAccess::user_area())
            .route("/dashboard", View::UserDashboard, RouteAccess::user_area())
            .route("/admin/dashboard", View::AdminDashboard, RouteAccess::admin_only())
            .route(
                "/instructor/dashboard",
                View::InstructorDashboard,
                RouteAccess::instructor_area(),
            )
    }

    pub fn route(mut self, pattern: &'static str, view: View, access: RouteAccess) -> Self {
        self.routes.push(RouteDef {
            pattern,
            view,
            access,
        });
        self
    }

    /// Resolve `path` (query string and fragment ignored).
    pub fn resolve(&self, path: &str) -> RouteMatch {
        let segments = split_path(path);

        self.routes
            .iter()
            .find_map(|def| {
                match_pattern(def.pattern, &segments).map(|params| RouteMatch {
                    view: def.view,
                    access: def.access.clone(),
                    params,
                })
            })
            .unwrap_or_else(|| RouteMatch {
                view: View::NotFound,
                access: RouteAccess::Unrestricted,
                params: BTreeMap::new(),
            })
    }

    /// Resolve `path` and run the guard for `session`.
    pub fn navigate(&self, session: &Session, path: &str) -> Navigation {
        let matched = self.resolve(path);
        match guard(session, &matched.access) {
            GuardDecision::Render => Navigation::Render(matched),
            GuardDecision::Redirect(redirect) => {
                tracing::debug!(path, to = redirect.to, reason = ?redirect.reason, "navigation redirected");
                Navigation::Redirect(redirect)
            }
        }
    }
}

fn split_path(path: &str) -> Vec<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let expected: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if expected.len() != segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (want, got) in expected.iter().zip(segments) {
        match want.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), (*got).to_string());
            }
            None if want == got => {}
            None => return None,
        }
    }
    Some(params)
}
