use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role identifier used for access decisions.
///
/// Roles are opaque strings; the protected resource decides which one it
/// requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of roles held by one principal. Ordered for stable output.
pub type RoleSet = BTreeSet<Role>;

/// Split a comma-joined role list into a set.
///
/// Tokens are trimmed and empty tokens dropped; duplicates collapse.
pub fn split_roles(value: &str) -> RoleSet {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Role::new(token.to_string()))
        .collect()
}

/// Render a role set back into the comma-joined file form.
pub fn join_roles<'a>(roles: impl IntoIterator<Item = &'a Role>) -> String {
    roles
        .into_iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
