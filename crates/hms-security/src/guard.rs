//! Navigation guard for the front end's protected routes.

use hms_core::{AccessPolicy, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "location", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Render the requested view.
    Allow,
    /// No authenticated user; send them to the login view.
    RedirectToLogin(String),
    /// Signed-in user opened a sign-in view; send them to their dashboard.
    RedirectToDashboard(String),
    /// Authenticated but not permitted; send them to the unauthorized view.
    RedirectToUnauthorized(String),
}

impl RouteDecision {
    /// Whether navigation may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RouteDecision::Allow)
    }
}

/// Redirect targets and routes that need no authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Where unauthenticated users are sent.
    pub login_path: String,
    /// Where denied users are sent.
    pub unauthorized_path: String,
    /// Exact paths open to everyone, signed in or not.
    pub public_routes: Vec<String>,
    /// Sign-in views that send an already signed-in user to their dashboard.
    pub auth_routes: Vec<String>,
    /// Landing page per role.
    pub dashboards: BTreeMap<Role, String>,
    /// Landing page for a role without a `dashboards` entry.
    pub fallback_dashboard: String,
}

impl GuardConfig {
    /// The landing page for `role`.
    pub fn dashboard_path(&self, role: &str) -> &str {
        Role::parse(role)
            .and_then(|role| self.dashboards.get(&role))
            .unwrap_or(&self.fallback_dashboard)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            unauthorized_path: "/401".to_string(),
            public_routes: [
                "/",
                "/login",
                "/register",
                "/forgot-password",
                "/reset-password",
                "/verify-email",
                "/401",
                "/404",
                "/maintenance",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            auth_routes: vec!["/login".to_string(), "/register".to_string()],
            dashboards: Role::ALL
                .into_iter()
                .map(|role| (role, format!("/{}/dashboard", role.as_str().to_ascii_lowercase())))
                .collect(),
            fallback_dashboard: "/patient/dashboard".to_string(),
        }
    }
}

/// Decides whether a navigation may proceed, given the current user's role.
#[derive(Debug, Clone)]
pub struct RouteGuard<P> {
    policy: P,
    config: GuardConfig,
}

impl<P: AccessPolicy> RouteGuard<P> {
    /// Creates a guard with the default redirect targets and public routes.
    pub fn new(policy: P) -> Self {
        Self::with_config(policy, GuardConfig::default())
    }

    /// Creates a guard with explicit redirect targets and public routes.
    pub fn with_config(policy: P, config: GuardConfig) -> Self {
        Self { policy, config }
    }

    /// The guard's configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Checks a navigation to `requested`.
    ///
    /// `role` is `None` when nobody is signed in. Query strings and fragments
    /// are ignored when matching.
    pub fn check(&self, role: Option<&str>, requested: &str) -> RouteDecision {
        let path = strip_query(requested);
        if let Some(role) = role {
            if self.config.auth_routes.iter().any(|auth| auth == path) {
                return RouteDecision::RedirectToDashboard(
                    self.config.dashboard_path(role).to_string(),
                );
            }
        }
        if self.config.public_routes.iter().any(|public| public == path) {
            return RouteDecision::Allow;
        }
        let Some(role) = role else {
            return RouteDecision::RedirectToLogin(self.config.login_path.clone());
        };
        if self.policy.can_access_route(role, path) {
            RouteDecision::Allow
        } else {
            tracing::debug!(role, "Navigation denied; redirecting to unauthorized view");
            RouteDecision::RedirectToUnauthorized(self.config.unauthorized_path.clone())
        }
    }
}

fn strip_query(requested: &str) -> &str {
    match requested.find(|c: char| c == '?' || c == '#') {
        Some(end) => &requested[..end],
        None => requested,
    }
}
