//! Ownership validators: single-purpose predicates tying a principal to the
//! specific object being acted upon.
//!
//! The role gate answers "does this user hold an allowed role at all"; a
//! validator answers "does this user own *this* object". A principal who is
//! admin of company A but targets company B passes the role gate and must be
//! stopped here.

use async_trait::async_trait;

use crewgate_core::{CompanyId, UserId};

use crate::context::{COMPANY_PK, ObjectIdentifiers, USER_PK};
use crate::directory::Directory;
use crate::error::AccessError;
use crate::principal::Principal;
use crate::roles::CompanyRole;

/// An ownership predicate run after the role gate.
///
/// Implementations must be deterministic for a snapshot of backing data and
/// must not mutate state. `required_keys` is checked by the caller before
/// `validate` runs; a missing key denies with [`AccessError::AmbiguousTarget`]
/// rather than silently passing.
#[async_trait]
pub trait OwnershipValidator: Send + Sync {
    /// Stable name used in denial messages and logs.
    fn name(&self) -> &'static str;

    /// Target identifier keys this validator cannot run without.
    fn required_keys(&self) -> &'static [&'static str];

    async fn validate(
        &self,
        principal: &Principal,
        targets: &ObjectIdentifiers,
        directory: &dyn Directory,
    ) -> Result<(), AccessError>;
}

fn lookup_failed(validator: &'static str, err: impl core::fmt::Display) -> AccessError {
    AccessError::ownership(validator, format!("lookup failed: {err}"))
}

/// Fail closed when a declared key is missing, even if the caller skipped
/// the checker's precheck.
fn require_key(
    targets: &ObjectIdentifiers,
    validator: &'static str,
    key: &'static str,
) -> Result<i64, AccessError> {
    targets
        .get(key)
        .ok_or(AccessError::AmbiguousTarget { validator, key })
}

/// Requires the principal's employment to tie them to the targeted company.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyMembership;

#[async_trait]
impl OwnershipValidator for CompanyMembership {
    fn name(&self) -> &'static str {
        "company_membership"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[COMPANY_PK]
    }

    async fn validate(
        &self,
        principal: &Principal,
        targets: &ObjectIdentifiers,
        directory: &dyn Directory,
    ) -> Result<(), AccessError> {
        let target = CompanyId::new(require_key(targets, self.name(), COMPANY_PK)?);

        let employment = directory
            .employment(principal.id)
            .await
            .map_err(|e| lookup_failed(self.name(), e))?;

        match employment {
            None => Err(AccessError::ownership(
                self.name(),
                "user has no employment record",
            )),
            Some(employment) if employment.company_id != target => Err(AccessError::ownership(
                self.name(),
                "not a member of this company",
            )),
            Some(_) => Ok(()),
        }
    }
}

/// Requires the principal to be an admin of the targeted company, not
/// merely to hold the admin role somewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyAdmin;

#[async_trait]
impl OwnershipValidator for CompanyAdmin {
    fn name(&self) -> &'static str {
        "company_admin"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[COMPANY_PK]
    }

    async fn validate(
        &self,
        principal: &Principal,
        targets: &ObjectIdentifiers,
        directory: &dyn Directory,
    ) -> Result<(), AccessError> {
        let target = CompanyId::new(require_key(targets, self.name(), COMPANY_PK)?);

        let is_admin = directory
            .holds_role_in(principal.id, target, CompanyRole::Admin)
            .await
            .map_err(|e| lookup_failed(self.name(), e))?;

        if is_admin {
            Ok(())
        } else {
            Err(AccessError::ownership(
                self.name(),
                "not an administrator of this company",
            ))
        }
    }
}

/// Requires the acting principal to be the targeted user (self-service).
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfOnly;

#[async_trait]
impl OwnershipValidator for SelfOnly {
    fn name(&self) -> &'static str {
        "self_only"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[USER_PK]
    }

    async fn validate(
        &self,
        principal: &Principal,
        targets: &ObjectIdentifiers,
        _directory: &dyn Directory,
    ) -> Result<(), AccessError> {
        let target = UserId::new(require_key(targets, self.name(), USER_PK)?);

        if principal.id == target {
            Ok(())
        } else {
            Err(AccessError::ownership(
                self.name(),
                "may only act on own account",
            ))
        }
    }
}
