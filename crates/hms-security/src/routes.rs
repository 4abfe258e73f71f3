//! Route-access rules and wildcard resolution.
//!
//! A rule's pattern is either an exact path (`/patients`) or a base path
//! followed by the wildcard segment `/*` (`/doctor/*`). Exact rules always win
//! over wildcard rules; when nothing matches the route is denied.

use crate::errors::SecurityError;
use hms_core::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

const WILDCARD_SUFFIX: &str = "/*";

/// How competing wildcard rules are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteMatchStrategy {
    /// The longest base path matching on a segment boundary wins.
    #[default]
    LongestPrefix,
    /// The first wildcard rule, in declaration order, whose base is a plain
    /// string prefix of the route wins.
    FirstDeclared,
}

impl RouteMatchStrategy {
    /// Canonical configuration value.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMatchStrategy::LongestPrefix => "longest-prefix",
            RouteMatchStrategy::FirstDeclared => "first-declared",
        }
    }
}

impl fmt::Display for RouteMatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteMatchStrategy {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "longest-prefix" => Ok(RouteMatchStrategy::LongestPrefix),
            "first-declared" => Ok(RouteMatchStrategy::FirstDeclared),
            other => Err(SecurityError::ConfigError(format!(
                "unknown route match strategy '{}' (expected 'longest-prefix' or 'first-declared')",
                other
            ))),
        }
    }
}

/// A single route pattern and the roles allowed through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Exact path or wildcard pattern ending in `/*`.
    pub pattern: String,
    /// Roles granted access, in declaration order.
    pub roles: Vec<Role>,
}

impl RouteRule {
    /// Creates a rule from a pattern and its allowed roles.
    pub fn new(pattern: impl Into<String>, roles: &[Role]) -> Self {
        Self {
            pattern: pattern.into(),
            roles: roles.to_vec(),
        }
    }

    /// The base path of a wildcard rule (pattern minus the trailing `/*`),
    /// or `None` for an exact rule.
    pub fn wildcard_base(&self) -> Option<&str> {
        self.pattern.strip_suffix(WILDCARD_SUFFIX)
    }

    /// Whether `role` is listed on this rule.
    pub fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    fn validate(&self) -> Result<(), SecurityError> {
        let pattern = self.pattern.as_str();
        if !pattern.starts_with('/') {
            return Err(SecurityError::InvalidTable(format!(
                "route pattern '{}' must start with '/'",
                pattern
            )));
        }
        if pattern.contains(|c: char| c == '?' || c == '#') {
            return Err(SecurityError::InvalidTable(format!(
                "route pattern '{}' must not carry a query string or fragment",
                pattern
            )));
        }
        let base = self.wildcard_base().unwrap_or(pattern);
        if base.contains('*') {
            return Err(SecurityError::InvalidTable(format!(
                "route pattern '{}' may only use '*' as a trailing '/*' segment",
                pattern
            )));
        }
        Ok(())
    }
}

/// Ordered route-access table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteAccessMap {
    rules: Vec<RouteRule>,
}

impl RouteAccessMap {
    /// Builds a map from rules in declaration order.
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Returns true when the table holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Finds the rule governing `route`.
    ///
    /// An exact pattern equal to `route` is returned first; otherwise the
    /// wildcard rules are resolved with `strategy`.
    pub fn resolve(&self, route: &str, strategy: RouteMatchStrategy) -> Option<&RouteRule> {
        if let Some(rule) = self.rules.iter().find(|rule| rule.pattern == route) {
            return Some(rule);
        }

        let mut wildcards = self
            .rules
            .iter()
            .filter_map(|rule| rule.wildcard_base().map(|base| (base, rule)));

        match strategy {
            RouteMatchStrategy::FirstDeclared => wildcards
                .find(|(base, _)| route.starts_with(base))
                .map(|(_, rule)| rule),
            RouteMatchStrategy::LongestPrefix => wildcards
                .filter(|(base, _)| is_segment_prefix(base, route))
                .fold(None, |best: Option<(&str, &RouteRule)>, candidate| match best {
                    Some(current) if current.0.len() >= candidate.0.len() => Some(current),
                    _ => Some(candidate),
                })
                .map(|(_, rule)| rule),
        }
    }

    /// Patterns whose role list contains `role`, in declaration order.
    pub fn patterns_for(&self, role: Role) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.allows(role))
            .map(|rule| rule.pattern.clone())
            .collect()
    }

    /// Checks every pattern's shape and rejects duplicate patterns.
    pub fn validate(&self) -> Result<(), SecurityError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            rule.validate()?;
            if !seen.insert(rule.pattern.as_str()) {
                return Err(SecurityError::InvalidTable(format!(
                    "duplicate route pattern '{}'",
                    rule.pattern
                )));
            }
        }
        Ok(())
    }
}

// `/doctor` covers `/doctor` and `/doctor/...` but not `/doctors`.
fn is_segment_prefix(base: &str, route: &str) -> bool {
    match route.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
