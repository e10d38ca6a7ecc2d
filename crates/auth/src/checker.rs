//! The permission check itself: three sequential gates, first failure wins.

use std::sync::Arc;

use crate::context::ObjectIdentifiers;
use crate::directory::Directory;
use crate::error::AccessError;
use crate::principal::Principal;
use crate::roles::CompanyRole;
use crate::validators::OwnershipValidator;

/// One authorization evaluation.
///
/// Stateless: `execute` reads per-request data only and may be called any
/// number of times with the same outcome for unchanged backing data.
///
/// Gate order: unauthenticated, superuser bypass, role membership, then the
/// validators in the order supplied (sequential short-circuit AND; a
/// validator's suspension is awaited before the next one runs).
///
/// The superuser bypass is absolute: no validator runs for a superuser, so
/// existence checks expressed as validators are skipped too. That is a
/// deliberate, security-sensitive choice; checks that must also bind
/// superusers belong in the protected operation itself.
pub struct PermissionChecker<'a> {
    principal: Option<&'a Principal>,
    allowed_roles: &'a [CompanyRole],
    validators: &'a [Arc<dyn OwnershipValidator>],
    targets: &'a ObjectIdentifiers,
    directory: &'a dyn Directory,
}

impl<'a> PermissionChecker<'a> {
    pub fn new(
        principal: Option<&'a Principal>,
        allowed_roles: &'a [CompanyRole],
        validators: &'a [Arc<dyn OwnershipValidator>],
        targets: &'a ObjectIdentifiers,
        directory: &'a dyn Directory,
    ) -> Self {
        Self {
            principal,
            allowed_roles,
            validators,
            targets,
            directory,
        }
    }

    /// Run all gates. `Ok(())` means the operation may proceed.
    pub async fn execute(&self) -> Result<(), AccessError> {
        let principal = match self.principal {
            Some(principal) => principal,
            None => {
                tracing::debug!("denied: no principal resolved");
                return Err(AccessError::Unauthenticated);
            }
        };

        if principal.is_superuser {
            tracing::debug!(principal = %principal.id, "superuser bypass, validators skipped");
            return Ok(());
        }

        if !principal.holds_any(self.allowed_roles) {
            tracing::debug!(principal = %principal.id, "denied at role gate");
            return Err(AccessError::RoleNotPermitted {
                required: self.allowed_roles.to_vec(),
            });
        }

        for validator in self.validators {
            for &key in validator.required_keys() {
                if !self.targets.contains(key) {
                    tracing::debug!(
                        principal = %principal.id,
                        validator = validator.name(),
                        key,
                        "denied: required target identifier missing"
                    );
                    return Err(AccessError::AmbiguousTarget {
                        validator: validator.name(),
                        key,
                    });
                }
            }

            validator
                .validate(principal, self.targets, self.directory)
                .await
                .inspect_err(|_| {
                    tracing::debug!(
                        principal = %principal.id,
                        validator = validator.name(),
                        "denied at validator gate"
                    );
                })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crewgate_core::{CompanyId, UserId};

    use crate::context::{CallArgs, extract};
    use crate::directory::{DirectoryError, Employment};

    /// Directory with a single employment row, enough for the gates.
    struct OneEmployment {
        user: UserId,
        company: CompanyId,
    }

    #[async_trait]
    impl Directory for OneEmployment {
        async fn employment(&self, user: UserId) -> Result<Option<Employment>, DirectoryError> {
            Ok((user == self.user).then_some(Employment {
                company_id: self.company,
            }))
        }

        async fn holds_role_in(
            &self,
            _user: UserId,
            _company: CompanyId,
            _role: CompanyRole,
        ) -> Result<bool, DirectoryError> {
            Ok(false)
        }
    }

    /// Validator with a fixed verdict that counts its invocations.
    struct Scripted {
        verdict: Result<(), AccessError>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn allowing() -> Self {
            Self {
                verdict: Ok(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn denying() -> Self {
            Self {
                verdict: Err(AccessError::ownership("scripted", "denied by script")),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OwnershipValidator for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn required_keys(&self) -> &'static [&'static str] {
            &[]
        }

        async fn validate(
            &self,
            _principal: &Principal,
            _targets: &ObjectIdentifiers,
            _directory: &dyn Directory,
        ) -> Result<(), AccessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict.clone()
        }
    }

    fn directory() -> OneEmployment {
        OneEmployment {
            user: UserId::new(1),
            company: CompanyId::new(5),
        }
    }

    fn no_targets() -> ObjectIdentifiers {
        let (_, targets) = extract(&CallArgs::new());
        targets
    }

    #[tokio::test]
    async fn absent_principal_is_unauthenticated() {
        let targets = no_targets();
        let directory = directory();
        let checker = PermissionChecker::new(None, &[CompanyRole::Admin], &[], &targets, &directory);
        assert_eq!(checker.execute().await, Err(AccessError::Unauthenticated));
    }

    #[tokio::test]
    async fn superuser_bypasses_roles_and_validators() {
        let principal = Principal::superuser(UserId::new(1));
        let denying: Arc<Scripted> = Arc::new(Scripted::denying());
        let validators: Vec<Arc<dyn OwnershipValidator>> = vec![denying.clone()];
        let targets = no_targets();
        let directory = directory();

        let checker = PermissionChecker::new(
            Some(&principal),
            &[CompanyRole::Admin],
            &validators,
            &targets,
            &directory,
        );

        assert_eq!(checker.execute().await, Ok(()));
        assert_eq!(denying.calls(), 0);
    }

    #[tokio::test]
    async fn empty_allowed_roles_denies_every_non_superuser() {
        let principal = Principal::new(UserId::new(1), CompanyRole::ALL);
        let targets = no_targets();
        let directory = directory();

        let checker = PermissionChecker::new(Some(&principal), &[], &[], &targets, &directory);
        assert_eq!(
            checker.execute().await,
            Err(AccessError::RoleNotPermitted { required: vec![] })
        );
    }

    #[tokio::test]
    async fn role_mismatch_denies_before_validators() {
        let principal = Principal::new(UserId::new(1), [CompanyRole::Moderator]);
        let allowing: Arc<Scripted> = Arc::new(Scripted::allowing());
        let validators: Vec<Arc<dyn OwnershipValidator>> = vec![allowing.clone()];
        let targets = no_targets();
        let directory = directory();

        let checker = PermissionChecker::new(
            Some(&principal),
            &[CompanyRole::Admin],
            &validators,
            &targets,
            &directory,
        );

        let err = checker.execute().await.unwrap_err();
        assert_eq!(
            err,
            AccessError::RoleNotPermitted {
                required: vec![CompanyRole::Admin]
            }
        );
        assert_eq!(allowing.calls(), 0);
    }

    #[tokio::test]
    async fn matching_role_is_necessary_but_not_sufficient() {
        let principal = Principal::new(UserId::new(1), [CompanyRole::Admin]);
        let validators: Vec<Arc<dyn OwnershipValidator>> = vec![Arc::new(Scripted::denying())];
        let targets = no_targets();
        let directory = directory();

        let checker = PermissionChecker::new(
            Some(&principal),
            &[CompanyRole::Admin],
            &validators,
            &targets,
            &directory,
        );

        assert!(matches!(
            checker.execute().await,
            Err(AccessError::OwnershipDenied { .. })
        ));
    }

    #[tokio::test]
    async fn first_failing_validator_short_circuits_the_rest() {
        let principal = Principal::new(UserId::new(1), [CompanyRole::Admin]);
        let second: Arc<Scripted> = Arc::new(Scripted::allowing());
        let validators: Vec<Arc<dyn OwnershipValidator>> =
            vec![Arc::new(Scripted::denying()), second.clone()];
        let targets = no_targets();
        let directory = directory();

        let checker = PermissionChecker::new(
            Some(&principal),
            &[CompanyRole::Admin],
            &validators,
            &targets,
            &directory,
        );

        assert!(checker.execute().await.is_err());
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn missing_required_key_denies_ambiguous_target() {
        let principal = Principal::new(UserId::new(1), [CompanyRole::Admin]);
        let validators: Vec<Arc<dyn OwnershipValidator>> =
            vec![Arc::new(crate::validators::CompanyMembership)];
        let targets = no_targets();
        let directory = directory();

        let checker = PermissionChecker::new(
            Some(&principal),
            &[CompanyRole::Admin],
            &validators,
            &targets,
            &directory,
        );

        assert_eq!(
            checker.execute().await,
            Err(AccessError::AmbiguousTarget {
                validator: "company_membership",
                key: "company_pk",
            })
        );
    }

    #[tokio::test]
    async fn execute_is_idempotent() {
        let principal = Principal::new(UserId::new(1), [CompanyRole::Admin]);
        let validators: Vec<Arc<dyn OwnershipValidator>> =
            vec![Arc::new(crate::validators::CompanyMembership)];
        let (_, targets) = extract(&CallArgs::new().arg("company_pk", 5));
        let directory = directory();

        let checker = PermissionChecker::new(
            Some(&principal),
            &[CompanyRole::Admin],
            &validators,
            &targets,
            &directory,
        );

        let first = checker.execute().await;
        let second = checker.execute().await;
        assert_eq!(first, Ok(()));
        assert_eq!(first, second);
    }
}
