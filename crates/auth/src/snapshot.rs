//! Immutable, fully parsed view of one credential file and one role file.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use usersroles_core::{Principal, Realm, RecordSource, StoreError, StoreResult};

use crate::config::CredentialScheme;
use crate::digest::{ct_equal, fingerprint};
use crate::records::{ParsedUsers, RoleRecord, parse_roles, parse_users};
use crate::roles::RoleSet;

#[derive(Debug, Clone)]
enum StoredSecret {
    /// Fingerprint of the plaintext password (case-folded if the scheme ignores case).
    Plain([u8; 32]),
    /// Decoded digest bytes.
    Digest(Vec<u8>),
}

#[derive(Debug, Clone)]
struct CredentialEntry {
    principal: Principal,
    secret: StoredSecret,
}

/// Immutable identity store snapshot.
///
/// Built once from text and never mutated; replacing it means building a new
/// one. Safe to share across threads without locking.
#[derive(Debug, Clone)]
pub struct IdentityStoreSnapshot {
    realm: Realm,
    scheme: CredentialScheme,
    /// Keyed by the lookup form of the principal (see `lookup_key`).
    credentials: HashMap<String, CredentialEntry>,
    roles: HashMap<String, RoleSet>,
    /// Compared against when the principal is unknown.
    decoy: StoredSecret,
    loaded_at: DateTime<Utc>,
}

impl IdentityStoreSnapshot {
    /// Parse both texts and build a snapshot.
    pub fn from_text(
        users_text: &str,
        roles_text: &str,
        scheme: CredentialScheme,
        default_realm: Option<&Realm>,
    ) -> StoreResult<Self> {
        let users = parse_users(users_text, default_realm)?;
        let roles = parse_roles(roles_text)?;
        Self::build(users, roles, scheme)
    }

    /// Build a snapshot from parsed records.
    ///
    /// Digested secrets are decoded here; one that does not decode with the
    /// configured encoding, or has the wrong length for the algorithm, fails
    /// the whole build.
    pub fn build(
        users: ParsedUsers,
        roles: Vec<RoleRecord>,
        scheme: CredentialScheme,
    ) -> StoreResult<Self> {
        let ParsedUsers { realm, records } = users;

        let mut credentials = HashMap::with_capacity(records.len());
        for record in records {
            let secret = stored_secret(&scheme, &record.secret)
                .map_err(|reason| StoreError::parse(RecordSource::Users, record.line, reason))?;
            let key = lookup_key(&scheme, record.principal.as_str()).into_owned();
            credentials.insert(
                key,
                CredentialEntry {
                    principal: record.principal,
                    secret,
                },
            );
        }

        let mut role_map = HashMap::with_capacity(roles.len());
        for record in roles {
            let key = lookup_key(&scheme, record.principal.as_str()).into_owned();
            role_map.insert(key, record.roles);
        }

        let decoy = if scheme.plain {
            StoredSecret::Plain(fingerprint(""))
        } else {
            StoredSecret::Digest(vec![0u8; scheme.digest.algorithm.output_len()])
        };

        tracing::debug!(
            realm = %realm,
            principals = credentials.len(),
            role_entries = role_map.len(),
            plain = scheme.plain,
            "identity store snapshot built"
        );

        Ok(Self {
            realm,
            scheme,
            credentials,
            roles: role_map,
            decoy,
            loaded_at: Utc::now(),
        })
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn scheme(&self) -> CredentialScheme {
        self.scheme
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Number of distinct principals with credentials.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Check a presented password for `principal`.
    ///
    /// Unknown principals and wrong passwords both return `false`.
    pub fn verify_credential(&self, principal: &str, password: &str) -> bool {
        self.verified_principal(principal, password).is_some()
    }

    /// Like [`verify_credential`](Self::verify_credential), returning the
    /// principal name as stored on success.
    pub fn verified_principal(&self, principal: &str, password: &str) -> Option<&Principal> {
        let entry = self
            .credentials
            .get(lookup_key(&self.scheme, principal).as_ref());

        // Unknown principals go through the same comparison against the decoy.
        let (name, secret) = match entry {
            Some(entry) => (entry.principal.as_str(), &entry.secret),
            None => (principal, &self.decoy),
        };
        let matched = self.secret_matches(name, secret, password);

        if entry.is_some() & matched {
            entry.map(|e| &e.principal)
        } else {
            None
        }
    }

    /// Roles held by `principal` (empty if it has no role entry).
    pub fn roles_of(&self, principal: &Principal) -> RoleSet {
        self.roles
            .get(lookup_key(&self.scheme, principal.as_str()).as_ref())
            .cloned()
            .unwrap_or_default()
    }

    fn secret_matches(&self, principal: &str, secret: &StoredSecret, password: &str) -> bool {
        match secret {
            StoredSecret::Plain(stored) => {
                let presented = fold_case(&self.scheme, password);
                ct_equal(&fingerprint(&presented), stored)
            }
            StoredSecret::Digest(stored) => {
                let computed = self
                    .scheme
                    .digest
                    .credential_digest(principal, &self.realm, password);
                ct_equal(&computed, stored)
            }
        }
    }
}

fn stored_secret(scheme: &CredentialScheme, secret: &str) -> Result<StoredSecret, String> {
    if scheme.plain {
        return Ok(StoredSecret::Plain(fingerprint(&fold_case(scheme, secret))));
    }

    let digest = scheme.digest;
    let bytes = digest
        .encoding
        .decode(secret)
        .ok_or_else(|| format!("secret is not valid {}", digest.encoding))?;
    if bytes.len() != digest.algorithm.output_len() {
        return Err(format!(
            "expected a {}-byte {} digest, got {} bytes",
            digest.algorithm.output_len(),
            digest.algorithm,
            bytes.len()
        ));
    }
    Ok(StoredSecret::Digest(bytes))
}

fn fold_case<'a>(scheme: &CredentialScheme, value: &'a str) -> Cow<'a, str> {
    if scheme.case_sensitive {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.to_lowercase())
    }
}

fn lookup_key<'a>(scheme: &CredentialScheme, principal: &'a str) -> Cow<'a, str> {
    fold_case(scheme, principal)
}
