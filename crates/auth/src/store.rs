//! File-backed identity store with atomic reload.
//!
//! Readers take an `Arc` to the active snapshot and keep using it for the
//! whole request; a reload builds a complete new snapshot and swaps the
//! pointer. No reader ever observes a partially built mapping.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

use usersroles_core::{StoreError, StoreResult};

use crate::access::{AccessOutcome, AuthOutcome, authenticate, authorize};
use crate::config::StoreConfig;
use crate::roles::Role;
use crate::snapshot::IdentityStoreSnapshot;

/// Identity store for one security domain.
#[derive(Debug)]
pub struct IdentityStore {
    config: StoreConfig,
    active: ArcSwap<IdentityStoreSnapshot>,
}

/// Shared store handle.
pub type SharedIdentityStore = Arc<IdentityStore>;

impl IdentityStore {
    /// Read the configured users and roles files and build the first snapshot.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, a file cannot be read, or any
    /// record is malformed.
    pub fn load(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let snapshot = read_snapshot(&config)?;

        tracing::info!(
            domain = %config.domain_name,
            realm = %snapshot.realm(),
            principals = snapshot.len(),
            loaded_at = %snapshot.loaded_at(),
            "identity store loaded"
        );

        Ok(Self::from_snapshot(config, snapshot))
    }

    /// Wrap an already built snapshot.
    pub fn from_snapshot(config: StoreConfig, snapshot: IdentityStoreSnapshot) -> Self {
        Self {
            config,
            active: ArcSwap::from_pointee(snapshot),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current snapshot. Holding the returned `Arc` pins that snapshot.
    pub fn snapshot(&self) -> Arc<IdentityStoreSnapshot> {
        self.active.load_full()
    }

    /// Re-read both files and swap in the result.
    ///
    /// Returns the number of principals in the new snapshot. On error the
    /// active snapshot is left untouched.
    pub fn reload(&self) -> StoreResult<usize> {
        match read_snapshot(&self.config) {
            Ok(snapshot) => {
                let count = snapshot.len();
                let loaded_at = snapshot.loaded_at();
                self.replace(snapshot);
                tracing::info!(
                    domain = %self.config.domain_name,
                    principals = count,
                    %loaded_at,
                    "identity store reloaded"
                );
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(
                    domain = %self.config.domain_name,
                    error = %err,
                    "identity store reload failed; keeping previous snapshot"
                );
                Err(err)
            }
        }
    }

    /// Swap in a new snapshot, returning the previous one.
    pub fn replace(&self, snapshot: IdentityStoreSnapshot) -> Arc<IdentityStoreSnapshot> {
        self.active.swap(Arc::new(snapshot))
    }

    /// Authenticate against the current snapshot.
    pub fn authenticate(&self, principal: &str, password: &str) -> AuthOutcome {
        authenticate(&self.snapshot(), principal, password)
    }

    /// Authenticate and authorize against one consistent snapshot.
    pub fn check_access(&self, principal: &str, password: &str, required: &Role) -> AccessOutcome {
        let snapshot = self.snapshot();
        let outcome = authenticate(&snapshot, principal, password);
        authorize(&outcome, required)
    }
}

fn read_snapshot(config: &StoreConfig) -> StoreResult<IdentityStoreSnapshot> {
    let users = read_text(&config.users_file_path)?;
    let roles = read_text(&config.roles_file_path)?;
    IdentityStoreSnapshot::from_text(
        &users,
        &roles,
        config.scheme(),
        config.default_realm().as_ref(),
    )
}

/// Read a users or roles file.
///
/// UTF-8 is tried first; anything else is decoded as ISO-8859-1, the
/// encoding properties files are traditionally written in.
fn read_text(path: &Path) -> StoreResult<String> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| char::from(b)).collect(),
    })
}
