//! In-memory directory of employments and company-scoped role grants.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crewgate_auth::{CompanyRole, Directory, DirectoryError, Employment};
use crewgate_core::{CompanyId, UserId};

/// Map-backed [`Directory`].
///
/// Registration happens up front (builder style); lookups are immutable
/// afterwards, matching the engine's read-only contract.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    employments: HashMap<UserId, Employment>,
    grants: HashMap<(UserId, CompanyId), HashSet<CompanyRole>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user` is employed by `company`.
    pub fn employ(mut self, user: UserId, company: CompanyId) -> Self {
        self.employments.insert(
            user,
            Employment {
                company_id: company,
            },
        );
        self
    }

    /// Grant `role` to `user` within `company`.
    pub fn grant(mut self, user: UserId, company: CompanyId, role: CompanyRole) -> Self {
        self.grants.entry((user, company)).or_default().insert(role);
        self
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn employment(&self, user: UserId) -> Result<Option<Employment>, DirectoryError> {
        Ok(self.employments.get(&user).copied())
    }

    async fn holds_role_in(
        &self,
        user: UserId,
        company: CompanyId,
        role: CompanyRole,
    ) -> Result<bool, DirectoryError> {
        Ok(self
            .grants
            .get(&(user, company))
            .is_some_and(|roles| roles.contains(&role)))
    }
}
