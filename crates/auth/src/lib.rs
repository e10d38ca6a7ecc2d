//! `crewgate-auth` — pure authorization boundary for company-scoped operations.
//!
//! This crate is intentionally decoupled from HTTP and storage: it receives a
//! resolved [`Principal`] from the authentication layer, reads backing data
//! through the [`Directory`] seam, and decides whether a protected operation
//! may proceed. Enforcement order: superuser bypass, then role membership,
//! then ownership validators (sequential, first failure wins).

pub mod checker;
pub mod context;
pub mod directory;
pub mod error;
pub mod guard;
pub mod principal;
pub mod roles;
pub mod validators;

pub use checker::PermissionChecker;
pub use context::{ArgValue, CallArgs, ObjectIdentifiers, extract};
pub use directory::{Directory, DirectoryError, Employment};
pub use error::{AccessDenial, AccessError, DenialKind};
pub use guard::Guard;
pub use principal::Principal;
pub use roles::CompanyRole;
pub use validators::{CompanyAdmin, CompanyMembership, OwnershipValidator, SelfOnly};
