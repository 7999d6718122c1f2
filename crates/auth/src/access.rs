//! Access decisions: authenticate, then check the required role.
//!
//! Each request is evaluated on its own against one snapshot:
//!
//! ```text
//! start -> authenticating -> rejected      -> Unauthorized
//!                         -> authenticated -> Granted | Forbidden
//! ```

use serde::Serialize;
use thiserror::Error;

use usersroles_core::Principal;

use crate::roles::{Role, RoleSet, join_roles};
use crate::snapshot::IdentityStoreSnapshot;

/// Why authentication was rejected.
///
/// There is deliberately a single reason: unknown principal and wrong
/// password are not distinguished.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidCredentials,
}

/// Result of authenticating a principal/password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated { principal: Principal, roles: RoleSet },
    Rejected(RejectReason),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthOutcome::Authenticated { principal, .. } => Some(principal),
            AuthOutcome::Rejected(_) => None,
        }
    }

    pub fn roles(&self) -> Option<&RoleSet> {
        match self {
            AuthOutcome::Authenticated { roles, .. } => Some(roles),
            AuthOutcome::Rejected(_) => None,
        }
    }
}

/// Final classification of a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOutcome {
    Granted,
    /// Authenticated, but the required role is missing.
    Forbidden,
    /// Authentication failed.
    Unauthorized,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("forbidden: missing role '{0}'")]
    MissingRole(Role),
}

impl AccessOutcome {
    /// HTTP status the transport layer must answer with.
    pub fn status_code(self) -> u16 {
        match self {
            AccessOutcome::Granted => 200,
            AccessOutcome::Forbidden => 403,
            AccessOutcome::Unauthorized => 401,
        }
    }

    pub fn into_result(self, required: &Role) -> Result<(), AccessError> {
        match self {
            AccessOutcome::Granted => Ok(()),
            AccessOutcome::Forbidden => Err(AccessError::MissingRole(required.clone())),
            AccessOutcome::Unauthorized => Err(AccessError::InvalidCredentials),
        }
    }
}

/// Authenticate `principal` with `password` against `snapshot`.
///
/// - No IO
/// - No panics
/// - Never says which check failed
pub fn authenticate(snapshot: &IdentityStoreSnapshot, principal: &str, password: &str) -> AuthOutcome {
    match snapshot.verified_principal(principal, password) {
        Some(stored) => {
            let roles = snapshot.roles_of(stored);
            tracing::debug!(principal = %stored, roles = %join_roles(&roles), "authenticated");
            AuthOutcome::Authenticated {
                principal: stored.clone(),
                roles,
            }
        }
        None => {
            tracing::debug!(principal, realm = %snapshot.realm(), "authentication rejected");
            AuthOutcome::Rejected(RejectReason::InvalidCredentials)
        }
    }
}

/// Classify an authentication outcome against the role a resource requires.
pub fn authorize(outcome: &AuthOutcome, required: &Role) -> AccessOutcome {
    let decision = match outcome {
        AuthOutcome::Rejected(_) => AccessOutcome::Unauthorized,
        AuthOutcome::Authenticated { roles, .. } if roles.contains(required) => AccessOutcome::Granted,
        AuthOutcome::Authenticated { .. } => AccessOutcome::Forbidden,
    };

    tracing::debug!(
        principal = outcome.principal().map(Principal::as_str),
        required = %required,
        ?decision,
        "access decision"
    );

    decision
}

/// Authenticate then authorize in one step.
pub fn check_access(
    snapshot: &IdentityStoreSnapshot,
    principal: &str,
    password: &str,
    required: &Role,
) -> AccessOutcome {
    authorize(&authenticate(snapshot, principal, password), required)
}
