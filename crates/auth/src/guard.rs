//! Declarative guard: policy attached to an operation at definition time.
//!
//! A guard is configured once with the allowed roles and an ordered
//! validator list, then enforced on every invocation before the protected
//! operation runs. On denial the operation never executes.

use std::future::Future;
use std::sync::Arc;

use crate::checker::PermissionChecker;
use crate::context::{CallArgs, extract};
use crate::directory::Directory;
use crate::error::AccessError;
use crate::roles::CompanyRole;
use crate::validators::OwnershipValidator;

/// Static policy for one protected operation.
#[derive(Clone, Default)]
pub struct Guard {
    allowed_roles: Vec<CompanyRole>,
    validators: Vec<Arc<dyn OwnershipValidator>>,
}

impl Guard {
    /// Policy allowing the given roles (empty set means superuser-only).
    pub fn with_roles(allowed: impl IntoIterator<Item = CompanyRole>) -> Self {
        Self {
            allowed_roles: allowed.into_iter().collect(),
            validators: Vec::new(),
        }
    }

    /// Append an ownership validator; validators run in append order.
    pub fn validator(mut self, validator: impl OwnershipValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Append an already-shared validator (e.g. one observed by tests or
    /// reused across guards).
    pub fn validator_shared(mut self, validator: Arc<dyn OwnershipValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn allowed_roles(&self) -> &[CompanyRole] {
        &self.allowed_roles
    }

    /// Extract context from the call arguments and run the gates.
    pub async fn authorize(
        &self,
        args: &CallArgs,
        directory: &dyn Directory,
    ) -> Result<(), AccessError> {
        let (principal, targets) = extract(args);
        PermissionChecker::new(
            principal,
            &self.allowed_roles,
            &self.validators,
            &targets,
            directory,
        )
        .execute()
        .await
    }

    /// Authorize, then invoke `operation` only on success.
    ///
    /// The operation's output and error types pass through unchanged
    /// (`E: From<AccessError>`), so guarded operations compose with other
    /// wrappers transparently.
    pub async fn run<T, E, F, Fut>(
        &self,
        args: &CallArgs,
        directory: &dyn Directory,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AccessError>,
    {
        self.authorize(args, directory).await?;
        operation().await
    }
}

impl core::fmt::Debug for Guard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("Guard")
            .field("allowed_roles", &self.allowed_roles)
            .field("validators", &names)
            .finish()
    }
}
