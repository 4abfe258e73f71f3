//! Policy-based access control
//!
//! [`PolicyEngine`] answers access questions over an immutable
//! [`PolicyTables`] value. Every string-facing query fails closed: an
//! unrecognised role, resource, action, feature, or route is denied rather
//! than reported as an error.

use crate::config::EngineConfig;
use crate::errors::SecurityError;
use crate::routes::RouteMatchStrategy;
use crate::tables::{PolicyTables, DEFAULT_TABLES};
use hms_core::{AccessPolicy, Action, Resource, Role, RolePermissions};
use std::sync::Arc;

/// Table-driven RBAC decisions.
///
/// Cloning is cheap; clones share the same tables.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    tables: Arc<PolicyTables>,
    route_match: RouteMatchStrategy,
}

impl PolicyEngine {
    /// Creates an engine over `tables` using the default route matching.
    pub fn new(tables: Arc<PolicyTables>) -> Self {
        Self {
            tables,
            route_match: RouteMatchStrategy::default(),
        }
    }

    /// Selects how competing wildcard route rules are resolved.
    pub fn with_route_match(mut self, route_match: RouteMatchStrategy) -> Self {
        self.route_match = route_match;
        self
    }

    /// Builds an engine from configuration, loading tables from disk when a
    /// path is configured.
    pub fn from_config(config: &EngineConfig) -> Result<Self, SecurityError> {
        let tables = config.load_tables()?;
        Ok(Self::new(tables).with_route_match(config.route_match))
    }

    /// The tables this engine decides over.
    pub fn tables(&self) -> &PolicyTables {
        &self.tables
    }

    /// The active wildcard resolution strategy.
    pub fn route_match(&self) -> RouteMatchStrategy {
        self.route_match
    }

    /// Typed permission check. `MANAGE` on a resource implies every action.
    pub fn allows(&self, role: Role, resource: Resource, action: Action) -> bool {
        self.tables
            .permissions
            .get(&role)
            .and_then(|grants| grants.get(&resource))
            .map(|actions| actions.contains(&action) || actions.contains(&Action::Manage))
            .unwrap_or(false)
    }

    /// Typed route check: exact pattern first, then wildcard, else deny.
    pub fn route_allows(&self, role: Role, route: &str) -> bool {
        if route.is_empty() {
            return false;
        }
        match self.tables.routes.resolve(route, self.route_match) {
            Some(rule) => rule.allows(role),
            None => {
                tracing::debug!(role = %role, "No route rule matched; denying");
                false
            }
        }
    }

    /// Typed feature-flag check; only an explicit `true` enables a feature.
    pub fn feature_allows(&self, role: Role, feature: &str) -> bool {
        self.tables
            .features
            .get(&role)
            .and_then(|features| features.get(feature))
            .copied()
            .unwrap_or(false)
    }

    /// Typed rank comparison. A role without a rank never outranks or is
    /// outranked.
    pub fn outranks(&self, role_a: Role, role_b: Role) -> bool {
        match (
            self.tables.hierarchy.get(&role_a),
            self.tables.hierarchy.get(&role_b),
        ) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    /// Whether `role` may open a record owned by `owner_id` while acting as
    /// `subject_id`.
    ///
    /// Administrators may open any record and patients only their own. Other
    /// staff roles pass here; assignment checks happen server-side.
    pub fn can_access_own_resource(&self, role: &str, subject_id: &str, owner_id: &str) -> bool {
        match Role::parse(role) {
            Some(Role::Admin) => true,
            Some(Role::Patient) => !subject_id.is_empty() && subject_id == owner_id,
            Some(_) => true,
            None => false,
        }
    }

    /// Like [`AccessPolicy::has_permission`], but returns an error on denial
    /// so call sites can propagate it with `?`.
    ///
    /// # Errors
    ///
    /// `UnknownIdentifier` when any identifier does not parse, otherwise
    /// `AuthorizationError` on denial.
    pub fn ensure_permission(&self, role: &str, resource: &str, action: &str) -> Result<(), SecurityError> {
        let role: Role = role.parse()?;
        let resource: Resource = resource.parse()?;
        let action: Action = action.parse()?;
        if self.allows(role, resource, action) {
            Ok(())
        } else {
            Err(SecurityError::AuthorizationError(format!(
                "role '{}' may not {} {}",
                role, action, resource
            )))
        }
    }

    /// Like [`AccessPolicy::can_access_route`], but returns an error on denial.
    ///
    /// The route itself is left out of the message since paths can carry
    /// record identifiers.
    pub fn ensure_route(&self, role: &str, route: &str) -> Result<(), SecurityError> {
        let role: Role = role.parse()?;
        if self.route_allows(role, route) {
            Ok(())
        } else {
            Err(SecurityError::AuthorizationError(format!(
                "role '{}' may not open the requested route",
                role
            )))
        }
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new(Arc::clone(&*DEFAULT_TABLES))
    }
}

fn parse_role(role: &str) -> Option<Role> {
    let parsed = Role::parse(role);
    if parsed.is_none() {
        tracing::debug!(role, "Unknown role; denying");
    }
    parsed
}

impl AccessPolicy for PolicyEngine {
    fn has_permission(&self, role: &str, resource: &str, action: &str) -> bool {
        let (Some(role), Some(resource), Some(action)) =
            (parse_role(role), Resource::parse(resource), Action::parse(action))
        else {
            tracing::debug!(resource, action, "Unknown resource or action; denying");
            return false;
        };
        let allowed = self.allows(role, resource, action);
        if !allowed {
            tracing::debug!(role = %role, resource = %resource, action = %action, "Permission denied");
        }
        allowed
    }

    fn can_access_route(&self, role: &str, route: &str) -> bool {
        parse_role(role).is_some_and(|role| self.route_allows(role, route))
    }

    fn has_feature_access(&self, role: &str, feature: &str) -> bool {
        parse_role(role).is_some_and(|role| self.feature_allows(role, feature))
    }

    fn is_higher_role(&self, role_a: &str, role_b: &str) -> bool {
        match (parse_role(role_a), parse_role(role_b)) {
            (Some(a), Some(b)) => self.outranks(a, b),
            _ => false,
        }
    }

    fn get_role_permissions(&self, role: &str) -> RolePermissions {
        parse_role(role)
            .and_then(|role| self.tables.permissions.get(&role))
            .cloned()
            .unwrap_or_default()
    }

    fn get_accessible_routes(&self, role: &str) -> Vec<String> {
        match parse_role(role) {
            Some(role) => self.tables.routes.patterns_for(role),
            None => Vec::new(),
        }
    }
}
