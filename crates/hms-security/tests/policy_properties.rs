//! Behavioural properties of the policy engine over the hospital defaults.

use hms_core::{Action, Resource, Role};
use hms_security::{AccessPolicy, PolicyEngine, RouteMatchStrategy, DEFAULT_TABLES};
use proptest::prelude::*;
use proptest::sample::select;

fn role() -> impl Strategy<Value = Role> {
    select(Role::ALL.to_vec())
}

fn resource() -> impl Strategy<Value = Resource> {
    select(Resource::ALL.to_vec())
}

fn action() -> impl Strategy<Value = Action> {
    select(Action::ALL.to_vec())
}

fn strategy() -> impl Strategy<Value = RouteMatchStrategy> {
    select(vec![RouteMatchStrategy::LongestPrefix, RouteMatchStrategy::FirstDeclared])
}

// Paths built from segments that appear in the default route table, so both
// hits and near misses are generated.
fn route() -> impl Strategy<Value = String> {
    let segment = select(vec![
        "admin", "doctor", "doctors", "nurse", "patient", "patients", "pharmacist",
        "receptionist", "billing", "reports", "settings", "inventory", "dashboard", "42",
    ]);
    proptest::collection::vec(segment, 1..4).prop_map(|segments| format!("/{}", segments.join("/")))
}

proptest! {
    #[test]
    fn missing_resource_entry_denies_every_action(role in role(), resource in resource(), action in action()) {
        let engine = PolicyEngine::default();
        let granted = DEFAULT_TABLES.permissions.get(&role).and_then(|grants| grants.get(&resource));
        if granted.is_none() {
            prop_assert!(!engine.has_permission(role.as_str(), resource.as_str(), action.as_str()));
        }
    }

    #[test]
    fn manage_implies_every_action(role in role(), resource in resource(), action in action()) {
        let engine = PolicyEngine::default();
        let manages = DEFAULT_TABLES
            .permissions
            .get(&role)
            .and_then(|grants| grants.get(&resource))
            .is_some_and(|actions| actions.contains(&Action::Manage));
        if manages {
            prop_assert!(engine.has_permission(role.as_str(), resource.as_str(), action.as_str()));
        }
    }

    #[test]
    fn exact_rules_ignore_overlapping_wildcards(role in role(), strategy in strategy()) {
        let engine = PolicyEngine::default().with_route_match(strategy);
        for rule in DEFAULT_TABLES.routes.rules() {
            prop_assert_eq!(engine.can_access_route(role.as_str(), &rule.pattern), rule.allows(role));
        }
    }

    #[test]
    fn unmatched_routes_are_denied(role in role(), route in route(), strategy in strategy()) {
        let engine = PolicyEngine::default().with_route_match(strategy);
        if DEFAULT_TABLES.routes.resolve(&route, strategy).is_none() {
            prop_assert!(!engine.can_access_route(role.as_str(), &route));
        }
    }

    #[test]
    fn higher_role_is_irreflexive_and_asymmetric(a in role(), b in role()) {
        let engine = PolicyEngine::default();
        prop_assert!(!engine.is_higher_role(a.as_str(), a.as_str()));
        prop_assert!(!(engine.is_higher_role(a.as_str(), b.as_str()) && engine.is_higher_role(b.as_str(), a.as_str())));
    }

    #[test]
    fn accessible_routes_agree_with_route_checks(role in role(), strategy in strategy()) {
        let engine = PolicyEngine::default().with_route_match(strategy);
        for pattern in engine.get_accessible_routes(role.as_str()) {
            prop_assert!(engine.can_access_route(role.as_str(), &pattern));
        }
    }

    #[test]
    fn role_permissions_agree_with_permission_checks(role in role()) {
        let engine = PolicyEngine::default();
        for (resource, actions) in engine.get_role_permissions(role.as_str()) {
            for action in actions {
                prop_assert!(engine.has_permission(role.as_str(), resource.as_str(), action.as_str()));
            }
        }
    }

    #[test]
    fn arbitrary_role_strings_fail_closed(role in "[A-Za-z_]{0,12}", feature in "[a-zA-Z]{0,16}") {
        let engine = PolicyEngine::default();
        if Role::parse(&role).is_none() {
            prop_assert!(!engine.has_permission(&role, "PATIENTS", "READ"));
            prop_assert!(!engine.can_access_route(&role, "/patients"));
            prop_assert!(!engine.has_feature_access(&role, &feature));
            prop_assert!(engine.get_role_permissions(&role).is_empty());
            prop_assert!(engine.get_accessible_routes(&role).is_empty());
        }
    }
}

#[test]
fn documented_scenarios() {
    let engine = PolicyEngine::default();
    assert!(engine.has_permission("ADMIN", "SETTINGS", "UPDATE"));
    assert!(!engine.has_permission("NURSE", "BILLING", "READ"));
    assert!(engine.can_access_route("DOCTOR", "/doctor/patients"));
    assert!(!engine.can_access_route("PATIENT", "/admin/dashboard"));
    assert!(engine.has_feature_access("RECEPTIONIST", "patientRegistration"));
    assert!(!engine.has_feature_access("RECEPTIONIST", "systemSettings"));
}

#[test]
fn scenarios_hold_under_both_strategies() {
    for strategy in [RouteMatchStrategy::LongestPrefix, RouteMatchStrategy::FirstDeclared] {
        let engine = PolicyEngine::default().with_route_match(strategy);
        assert!(engine.can_access_route("DOCTOR", "/doctor/patients"), "{}", strategy);
        assert!(!engine.can_access_route("PATIENT", "/admin/dashboard"), "{}", strategy);
    }
}
