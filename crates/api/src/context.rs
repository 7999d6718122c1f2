use usersroles_auth::{Principal, RoleSet};

/// Authenticated identity for a request that passed the access gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
    roles: RoleSet,
}

impl PrincipalContext {
    pub fn new(principal: Principal, roles: RoleSet) -> Self {
        Self { principal, roles }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }
}
