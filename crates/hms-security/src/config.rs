//! Engine configuration loaded from the environment.

use crate::errors::SecurityError;
use crate::routes::RouteMatchStrategy;
use crate::tables::{PolicyTables, DEFAULT_TABLES};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Path to a JSON policy-tables file. Unset means the compiled defaults.
pub const TABLES_ENV_VAR: &str = "HMS_POLICY_TABLES";
/// Wildcard route resolution: `longest-prefix` or `first-declared`.
pub const ROUTE_MATCH_ENV_VAR: &str = "HMS_ROUTE_MATCH";

/// Where the engine's tables come from and how routes are matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// JSON tables file; `None` selects the hospital defaults.
    pub tables_path: Option<PathBuf>,
    /// Wildcard route resolution.
    pub route_match: RouteMatchStrategy,
}

impl EngineConfig {
    /// Reads `HMS_POLICY_TABLES` and `HMS_ROUTE_MATCH`. Blank values count as
    /// unset.
    ///
    /// # Errors
    ///
    /// Returns `SecurityError::ConfigError` when `HMS_ROUTE_MATCH` names an
    /// unknown strategy or either variable is not valid unicode.
    pub fn from_env() -> Result<Self, SecurityError> {
        let tables_path = read_var(TABLES_ENV_VAR)?
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let route_match = match read_var(ROUTE_MATCH_ENV_VAR)?.filter(|value| !value.trim().is_empty()) {
            Some(value) => value.parse()?,
            None => RouteMatchStrategy::default(),
        };

        if tables_path.is_none() {
            tracing::debug!("{} not set; using compiled policy tables", TABLES_ENV_VAR);
        }

        Ok(Self {
            tables_path,
            route_match,
        })
    }

    /// Loads the configured tables, or shares the compiled defaults.
    pub fn load_tables(&self) -> Result<Arc<PolicyTables>, SecurityError> {
        match &self.tables_path {
            Some(path) => Ok(Arc::new(PolicyTables::from_path(path)?)),
            None => Ok(Arc::clone(&*DEFAULT_TABLES)),
        }
    }
}

fn read_var(name: &str) -> Result<Option<String>, SecurityError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(SecurityError::ConfigError(format!(
            "Environment variable {} is invalid: {}",
            name, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var(TABLES_ENV_VAR);
        env::remove_var(ROUTE_MATCH_ENV_VAR);
    }

    #[test]
    fn test_defaults_when_unset() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config, EngineConfig::default());
        let tables = config.load_tables().unwrap();
        assert!(Arc::ptr_eq(&tables, &*DEFAULT_TABLES));
    }

    #[test]
    fn test_route_match_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(ROUTE_MATCH_ENV_VAR, "first-declared");
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.route_match, RouteMatchStrategy::FirstDeclared);
        clear_env();
    }

    #[test]
    fn test_invalid_route_match() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(ROUTE_MATCH_ENV_VAR, "random");
        match EngineConfig::from_env() {
            Err(SecurityError::ConfigError(msg)) => assert!(msg.contains("random")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
        clear_env();
    }

    #[test]
    fn test_blank_tables_path_is_ignored() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(TABLES_ENV_VAR, "  ");
        assert_eq!(EngineConfig::from_env().unwrap().tables_path, None);
        clear_env();
    }

    #[test]
    fn test_blank_route_match_uses_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(ROUTE_MATCH_ENV_VAR, "");
        assert_eq!(
            EngineConfig::from_env().unwrap().route_match,
            RouteMatchStrategy::LongestPrefix
        );
        env::set_var(ROUTE_MATCH_ENV_VAR, "   ");
        assert_eq!(
            EngineConfig::from_env().unwrap().route_match,
            RouteMatchStrategy::default()
        );
        clear_env();
    }

    #[test]
    fn test_tables_loaded_from_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"hierarchy": {{"PATIENT": 1}}, "permissions": {{}}, "routes": [{{"pattern": "/patient/*", "roles": ["PATIENT"]}}]}}"#
        )
        .unwrap();
        env::set_var(TABLES_ENV_VAR, file.path());

        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.tables_path.as_deref(), Some(file.path()));
        let tables = config.load_tables().unwrap();
        assert_eq!(tables.routes.len(), 1);
        clear_env();
    }

    #[test]
    fn test_missing_tables_file() {
        let config = EngineConfig {
            tables_path: Some(PathBuf::from("/nonexistent/hms-policy.json")),
            route_match: RouteMatchStrategy::default(),
        };
        assert!(matches!(config.load_tables(), Err(SecurityError::Io(_))));
    }
}
