//! Store configuration.
//!
//! One struct enumerates every recognized option; a store is built from it
//! directly rather than from per-deployment specializations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use usersroles_core::{Realm, StoreError, StoreResult};

use crate::digest::{DigestAlgorithm, DigestConfig, Encoding};

const ENV_PREFIX: &str = "USERSROLES_";

/// How presented passwords are checked against stored secrets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialScheme {
    /// Secrets are stored as plaintext passwords.
    pub plain: bool,
    /// Digest parameters, used when `plain` is false.
    pub digest: DigestConfig,
    /// When false, principal and plaintext password matching ignore case.
    pub case_sensitive: bool,
}

impl Default for CredentialScheme {
    fn default() -> Self {
        Self {
            plain: true,
            digest: DigestConfig::default(),
            case_sensitive: true,
        }
    }
}

impl CredentialScheme {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn digest(algorithm: DigestAlgorithm, encoding: Encoding) -> Self {
        Self {
            plain: false,
            digest: DigestConfig::new(algorithm, encoding),
            ..Self::default()
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// Full configuration of one users/roles security domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Security domain this store backs (used for logging).
    pub domain_name: String,
    /// Realm used when the credential file has no realm header.
    pub realm_name: Option<String>,
    pub users_file_path: PathBuf,
    pub roles_file_path: PathBuf,
    pub plain: bool,
    pub digest: DigestConfig,
    pub case_sensitive: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let scheme = CredentialScheme::default();
        Self {
            domain_name: "other".to_string(),
            realm_name: None,
            users_file_path: PathBuf::from("users.properties"),
            roles_file_path: PathBuf::from("roles.properties"),
            plain: scheme.plain,
            digest: scheme.digest,
            case_sensitive: scheme.case_sensitive,
        }
    }
}

impl StoreConfig {
    pub fn new(
        domain_name: impl Into<String>,
        users_file_path: impl Into<PathBuf>,
        roles_file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            users_file_path: users_file_path.into(),
            roles_file_path: roles_file_path.into(),
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: CredentialScheme) -> Self {
        self.plain = scheme.plain;
        self.digest = scheme.digest;
        self.case_sensitive = scheme.case_sensitive;
        self
    }

    pub fn with_realm(mut self, realm_name: impl Into<String>) -> Self {
        self.realm_name = Some(realm_name.into());
        self
    }

    pub fn scheme(&self) -> CredentialScheme {
        CredentialScheme {
            plain: self.plain,
            digest: self.digest,
            case_sensitive: self.case_sensitive,
        }
    }

    pub fn default_realm(&self) -> Option<Realm> {
        self.realm_name.as_deref().map(Realm::new)
    }

    /// Read configuration from `USERSROLES_*` environment variables.
    ///
    /// `USERSROLES_USERS_FILE` and `USERSROLES_ROLES_FILE` are required.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`], with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let required = |name: &str| {
            var(name).ok_or_else(|| StoreError::config(format!("{ENV_PREFIX}{name} is not set")))
        };

        let mut config = Self::new(
            var("DOMAIN").unwrap_or_else(|| Self::default().domain_name),
            required("USERS_FILE")?,
            required("ROLES_FILE")?,
        );
        config.realm_name = var("REALM");

        if let Some(value) = var("PLAIN") {
            config.plain = parse_bool("PLAIN", &value)?;
        }
        if let Some(value) = var("CASE_SENSITIVE") {
            config.case_sensitive = parse_bool("CASE_SENSITIVE", &value)?;
        }
        if let Some(value) = var("DIGEST_ALGORITHM") {
            config.digest.algorithm = value.parse()?;
        }
        if let Some(value) = var("DIGEST_ENCODING") {
            config.digest.encoding = value.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.domain_name.trim().is_empty() {
            return Err(StoreError::config("domain name must not be empty"));
        }
        if self.users_file_path.as_os_str().is_empty() {
            return Err(StoreError::config("users file path must not be empty"));
        }
        if self.roles_file_path.as_os_str().is_empty() {
            return Err(StoreError::config("roles file path must not be empty"));
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> StoreResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(StoreError::config(format!(
            "{ENV_PREFIX}{name}: expected a boolean, got '{other}'"
        ))),
    }
}
