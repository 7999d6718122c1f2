//! `usersroles-auth` — file-backed users/roles authentication and authorization.
//!
//! This crate is decoupled from HTTP: it parses credential and role files into
//! immutable snapshots, verifies passwords, and classifies access requests.

pub mod access;
pub mod config;
pub mod digest;
pub mod fixtures;
pub mod records;
pub mod roles;
pub mod snapshot;
pub mod store;

pub use access::{AccessError, AccessOutcome, AuthOutcome, RejectReason, authenticate, authorize, check_access};
pub use config::{CredentialScheme, StoreConfig};
pub use digest::{DigestAlgorithm, DigestConfig, Encoding};
pub use records::{CredentialRecord, ParsedUsers, RoleRecord, parse_roles, parse_users};
pub use roles::{Role, RoleSet};
pub use snapshot::IdentityStoreSnapshot;
pub use store::{IdentityStore, SharedIdentityStore};

pub use usersroles_core::{Principal, Realm, RecordSource, StoreError, StoreResult};
