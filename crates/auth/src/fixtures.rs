//! Scoped provisioning of users/roles files.
//!
//! [`PropertyFiles`] writes a plaintext users/roles pair and an MD5-digested
//! companion pair into a private temporary directory. The files live exactly
//! as long as the value: dropping it (including during a panic unwind)
//! deletes the directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use usersroles_core::{Realm, StoreError, StoreResult};

use crate::config::{CredentialScheme, StoreConfig};
use crate::digest::{DigestAlgorithm, DigestConfig, Encoding};

pub const USERS_FILE: &str = "test-users.properties";
pub const ROLES_FILE: &str = "test-roles.properties";
pub const USERS_MD5_FILE: &str = "test-users-md5.properties";
pub const ROLES_MD5_FILE: &str = "test-roles-md5.properties";

/// One account to provision.
#[derive(Debug, Clone, Copy)]
pub struct Account<'a> {
    pub name: &'a str,
    pub password: &'a str,
    pub roles: &'a [&'a str],
}

impl<'a> Account<'a> {
    pub fn new(name: &'a str, password: &'a str, roles: &'a [&'a str]) -> Self {
        Self { name, password, roles }
    }
}

/// Render a credential file, with secrets digested when `digest` is given.
pub fn render_users(realm: &Realm, accounts: &[Account<'_>], digest: Option<DigestConfig>) -> String {
    let mut lines = vec![realm.header_line()];
    lines.extend(accounts.iter().map(|account| {
        let secret = match digest {
            Some(config) => config.render_credential(account.name, realm, account.password),
            None => account.password.to_string(),
        };
        format!("{}={}", account.name, secret)
    }));
    lines.join("\n")
}

/// Render a role file.
pub fn render_roles(accounts: &[Account<'_>]) -> String {
    accounts
        .iter()
        .map(|account| format!("{}={}", account.name, account.roles.join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Provisioned users/roles files, removed on drop.
#[derive(Debug)]
pub struct PropertyFiles {
    dir: TempDir,
    realm: Realm,
}

impl PropertyFiles {
    /// Write all four files for `accounts` under `realm`.
    pub fn create(realm: Realm, accounts: &[Account<'_>]) -> StoreResult<Self> {
        let dir = TempDir::new().map_err(|e| StoreError::io(std::env::temp_dir(), e))?;
        let md5 = DigestConfig::new(DigestAlgorithm::Md5, Encoding::Hex);
        let roles = render_roles(accounts);

        write(dir.path(), USERS_FILE, &render_users(&realm, accounts, None))?;
        write(dir.path(), ROLES_FILE, &roles)?;
        write(dir.path(), USERS_MD5_FILE, &render_users(&realm, accounts, Some(md5)))?;
        write(dir.path(), ROLES_MD5_FILE, &roles)?;

        tracing::debug!(dir = %dir.path().display(), accounts = accounts.len(), "provisioned property files");
        Ok(Self { dir, realm })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn users_path(&self) -> PathBuf {
        self.dir.path().join(USERS_FILE)
    }

    pub fn roles_path(&self) -> PathBuf {
        self.dir.path().join(ROLES_FILE)
    }

    pub fn users_md5_path(&self) -> PathBuf {
        self.dir.path().join(USERS_MD5_FILE)
    }

    pub fn roles_md5_path(&self) -> PathBuf {
        self.dir.path().join(ROLES_MD5_FILE)
    }

    /// Store configuration for the plaintext pair.
    pub fn plain_config(&self, domain_name: &str) -> StoreConfig {
        StoreConfig::new(domain_name, self.users_path(), self.roles_path())
            .with_scheme(CredentialScheme::plain())
    }

    /// Store configuration for the MD5/hex pair.
    pub fn md5_config(&self, domain_name: &str) -> StoreConfig {
        StoreConfig::new(domain_name, self.users_md5_path(), self.roles_md5_path())
            .with_scheme(CredentialScheme::digest(DigestAlgorithm::Md5, Encoding::Hex))
    }

    /// Delete the files now, reporting any failure.
    pub fn close(self) -> StoreResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| StoreError::io(path, e))
    }
}

fn write(dir: &Path, name: &str, contents: &str) -> StoreResult<()> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|e| StoreError::io(path, e))
}
