//! Role-based route protection
//!
//! [`decide`] is the gate itself: a pure function of the signed-in user, the role a
//! route requires and the requested path. [`resolve`] applies it to the application's
//! route table.

use crate::core::models::{Role, User};
use serde::Serialize;

/// Login entry point
pub const LOGIN_PATH: &str = "/login";

/// Outcome of a protected navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RouteDecision {
    /// Show the requested view
    Render,
    /// Navigate elsewhere instead
    Redirect {
        /// Target path
        to: String,
        /// Location to return to after a successful login
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
    },
}

impl RouteDecision {
    fn redirect(to: &str, from: Option<&str>) -> Self {
        Self::Redirect {
            to: to.to_string(),
            from: from.map(str::to_string),
        }
    }
}

/// Dashboard path for a role; unknown roles go back to login
#[must_use]
pub const fn role_home(role: Role) -> &'static str {
    match role {
        Role::Student => "/student",
        Role::Faculty => "/faculty",
        Role::Admin => "/admin",
        Role::Unknown => LOGIN_PATH,
    }
}

/// Decide whether `requested_path` may render for `user`
///
/// 1. No user: redirect to login, remembering `requested_path`.
/// 2. A required role the user does not hold: redirect to the user's own home.
/// 3. Otherwise render.
#[must_use]
pub fn decide(user: Option<&User>, required: Option<Role>, requested_path: &str) -> RouteDecision {
    let Some(user) = user else {
        return RouteDecision::redirect(LOGIN_PATH, Some(requested_path));
    };
    match required {
        Some(role) if user.role != role => RouteDecision::redirect(role_home(user.role), None),
        _ => RouteDecision::Render,
    }
}

/// Entry in the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Exact path
    pub path: &'static str,
    /// Role required to open it; `None` for public routes
    pub role: Option<Role>,
    /// Title of the view
    pub title: &'static str,
    /// Whether a session is required at all
    pub protected: bool,
}

const fn protected(path: &'static str, role: Role, title: &'static str) -> Route {
    Route {
        path,
        role: Some(role),
        title,
        protected: true,
    }
}

/// Every route the client knows about; protected routes also require their role
pub const ROUTES: &[Route] = &[
    Route {
        path: LOGIN_PATH,
        role: None,
        title: "Sign in",
        protected: false,
    },
    protected("/student", Role::Student, "Student Dashboard"),
    protected("/student/plan", Role::Student, "Degree Plan"),
    protected("/student/requests", Role::Student, "Requests"),
    protected("/student/notifications", Role::Student, "Notifications"),
    protected("/student/coop-request", Role::Student, "Co-op Request"),
    protected("/faculty", Role::Faculty, "Faculty Dashboard"),
    protected("/faculty/approvals", Role::Faculty, "Approvals"),
    protected("/faculty/students", Role::Faculty, "Advisees"),
    protected("/admin", Role::Admin, "Admin Dashboard"),
    protected("/admin/catalog", Role::Admin, "Catalog Admin"),
    protected("/admin/users", Role::Admin, "User Admin"),
];

/// Look up a route, ignoring one trailing slash
#[must_use]
pub fn find_route(path: &str) -> Option<&'static Route> {
    let trimmed = if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    };
    ROUTES.iter().find(|r| r.path == trimmed)
}

/// Resolve a navigation against the route table
///
/// Unknown paths redirect to login without remembering where the user was going.
#[must_use]
pub fn resolve(path: &str, user: Option<&User>) -> RouteDecision {
    match find_route(path) {
        Some(route) if route.protected => decide(user, route.role, route.path),
        Some(_) => RouteDecision::Render,
        None => {
            crate::debug!("No route for '{path}', falling back to login");
            RouteDecision::redirect(LOGIN_PATH, None)
        }
    }
}

/// Navigation entries shown to a role
#[must_use]
pub fn nav_links(role: Role) -> Vec<&'static Route> {
    const STUDENT: &[&str] = &[
        "/student",
        "/student/plan",
        "/student/coop-request",
        "/student/notifications",
    ];
    const FACULTY: &[&str] = &["/faculty", "/faculty/approvals", "/faculty/students"];
    const ADMIN: &[&str] = &["/admin", "/admin/catalog", "/admin/users"];

    let paths: &[&str] = match role {
        Role::Student => STUDENT,
        Role::Faculty => FACULTY,
        Role::Admin => ADMIN,
        Role::Unknown => &[],
    };
    paths.iter().filter_map(|p| find_route(p)).collect()
}
