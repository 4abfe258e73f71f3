// Copyright 2024 Helix Platform
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The policy enforcement seam.
//!
//! Route guards, UI renderers, and navigation builders depend on
//! [`AccessPolicy`] rather than on a concrete engine, so alternate tables or
//! stub policies can be substituted in tests.

use crate::errors::HmsError;
use crate::types::{Action, Permission, Resource, Role};
use std::collections::{BTreeMap, BTreeSet};

/// A role's full grant set: resource to the actions allowed on it.
///
/// Returned as an owned copy; mutating it has no effect on the policy.
pub type RolePermissions = BTreeMap<Resource, BTreeSet<Action>>;

/// Read-only access decisions over string identifiers.
///
/// Every query fails closed: an unknown role, resource, action, feature, or
/// route yields `false` (or an empty collection), never an error.
pub trait AccessPolicy: Send + Sync {
    /// Checks whether `role` may perform `action` on `resource`.
    ///
    /// `MANAGE` on a resource implies every other action on it.
    fn has_permission(&self, role: &str, resource: &str, action: &str) -> bool;

    /// Checks whether `role` may navigate to the concrete path `route`.
    fn can_access_route(&self, role: &str, route: &str) -> bool;

    /// Checks whether the UI affordance `feature` is enabled for `role`.
    fn has_feature_access(&self, role: &str, feature: &str) -> bool;

    /// Returns true when `role_a` ranks strictly above `role_b`.
    ///
    /// Rank is never consulted by the permission or route checks.
    fn is_higher_role(&self, role_a: &str, role_b: &str) -> bool;

    /// Returns the role's permission matrix entry, or an empty map.
    fn get_role_permissions(&self, role: &str) -> RolePermissions;

    /// Returns the route patterns granted to `role`, in declaration order.
    fn get_accessible_routes(&self, role: &str) -> Vec<String>;

    /// Checks a single dotted permission such as `"patients.read"`.
    ///
    /// Malformed or unknown permission strings are never held.
    fn holds_permission(&self, role: &str, permission: &str) -> bool {
        match permission.parse::<Permission>() {
            Ok(permission) => self.has_permission(
                role,
                permission.resource.as_str(),
                permission.action.as_str(),
            ),
            Err(_) => false,
        }
    }

    /// Like [`AccessPolicy::holds_permission`], but returns an error so call
    /// sites can propagate a denial with `?`.
    ///
    /// # Errors
    ///
    /// `UnknownIdentifier` for a malformed permission string and
    /// `PolicyViolation` when the permission is not held.
    fn require_permission(&self, role: &str, permission: &str) -> Result<(), HmsError> {
        let permission: Permission = permission.parse()?;
        if self.has_permission(
            role,
            permission.resource.as_str(),
            permission.action.as_str(),
        ) {
            Ok(())
        } else {
            Err(HmsError::PolicyViolation(format!(
                "role '{}' lacks {}",
                role, permission
            )))
        }
    }

    /// True when at least one of the dotted permissions is held.
    fn has_any_permission(&self, role: &str, permissions: &[&str]) -> bool {
        permissions
            .iter()
            .any(|permission| self.holds_permission(role, permission))
    }

    /// True when every dotted permission is held.
    ///
    /// An empty list is vacuously satisfied for a known role; an unknown role
    /// holds nothing.
    fn has_all_permissions(&self, role: &str, permissions: &[&str]) -> bool {
        Role::parse(role).is_some()
            && permissions
                .iter()
                .all(|permission| self.holds_permission(role, permission))
    }

    /// True when `role` parses to one of `allowed`.
    fn has_any_role(&self, role: &str, allowed: &[Role]) -> bool {
        Role::parse(role).is_some_and(|role| allowed.contains(&role))
    }
}
