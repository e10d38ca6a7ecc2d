//! Resolved request identity.

use std::collections::BTreeSet;

use crewgate_core::UserId;

use crate::roles::CompanyRole;

/// A fully resolved principal for authorization decisions.
///
/// Constructed by the authentication layer once per request, after
/// credential verification; immutable for the duration of a check and never
/// persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub is_superuser: bool,
    pub roles: BTreeSet<CompanyRole>,
}

impl Principal {
    pub fn new(id: UserId, roles: impl IntoIterator<Item = CompanyRole>) -> Self {
        Self {
            id,
            is_superuser: false,
            roles: roles.into_iter().collect(),
        }
    }

    /// A principal with the global superuser override and no roles.
    pub fn superuser(id: UserId) -> Self {
        Self {
            id,
            is_superuser: true,
            roles: BTreeSet::new(),
        }
    }

    pub fn holds(&self, role: CompanyRole) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the principal holds at least one of `allowed`.
    pub fn holds_any(&self, allowed: &[CompanyRole]) -> bool {
        allowed.iter().any(|role| self.roles.contains(role))
    }
}
