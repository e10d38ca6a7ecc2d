//! Read-only collaborator seam consumed by ownership validators.
//!
//! Implementations live outside this crate (the reference in-memory one is
//! in `crewgate-infra`); the engine only ever reads through this trait and
//! holds no connection or pool of its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crewgate_core::{CompanyId, UserId};

use crate::roles::CompanyRole;

/// A user's employment record: the company they are tied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    pub company_id: CompanyId,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The backing lookup failed. Validators surface this as a deny; the
    /// engine never retries.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Directory of employments and company-scoped role grants.
#[async_trait]
pub trait Directory: Send + Sync {
    /// The principal's employment record, if they have one.
    async fn employment(&self, user: UserId) -> Result<Option<Employment>, DirectoryError>;

    /// Whether `user` holds `role` within `company` specifically (as
    /// opposed to holding the role anywhere).
    async fn holds_role_in(
        &self,
        user: UserId,
        company: CompanyId,
        role: CompanyRole,
    ) -> Result<bool, DirectoryError>;
}
