//! Server configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use usersroles_auth::{Role, StoreConfig, StoreError};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REQUIRED_ROLE: &str = "gooduser";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("USERSROLES_REQUIRED_ROLE must not be empty")]
    EmptyRole,
}

/// Configuration of the HTTP server hosting one protected resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Role the protected routes require.
    pub required_role: Role,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn new(store: StoreConfig) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            required_role: Role::new(DEFAULT_REQUIRED_ROLE),
            store,
        }
    }

    /// Read `USERSROLES_BIND`, `USERSROLES_REQUIRED_ROLE` and the store variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = StoreConfig::from_lookup(&lookup)?;
        let mut config = Self::new(store);

        if let Some(bind) = lookup("USERSROLES_BIND") {
            config.bind_addr = bind;
        }
        if let Some(role) = lookup("USERSROLES_REQUIRED_ROLE") {
            let role = role.trim();
            if role.is_empty() {
                return Err(ConfigError::EmptyRole);
            }
            config.required_role = Role::new(role.to_string());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[
            ("USERSROLES_USERS_FILE", "users.properties"),
            ("USERSROLES_ROLES_FILE", "roles.properties"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.required_role, Role::new(DEFAULT_REQUIRED_ROLE));
    }

    #[test]
    fn overrides_apply() {
        let config = AppConfig::from_lookup(lookup(&[
            ("USERSROLES_USERS_FILE", "users.properties"),
            ("USERSROLES_ROLES_FILE", "roles.properties"),
            ("USERSROLES_BIND", "127.0.0.1:9000"),
            ("USERSROLES_REQUIRED_ROLE", "admin"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.required_role, Role::new("admin"));
    }

    #[test]
    fn empty_role_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("USERSROLES_USERS_FILE", "users.properties"),
            ("USERSROLES_ROLES_FILE", "roles.properties"),
            ("USERSROLES_REQUIRED_ROLE", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRole));
    }

    #[test]
    fn missing_store_settings_surface_as_store_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Store(_)));
    }
}
