//! Denial taxonomy.
//!
//! Every variant is terminal: the engine never retries a failed gate, and a
//! validator that cannot determine ownership fails closed. Transport status
//! mapping is the caller's responsibility; [`AccessDenial`] is the structured
//! payload handed outward.

use serde::Serialize;
use thiserror::Error;

use crate::roles::CompanyRole;

/// Why a protected operation was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No resolvable principal; denies before any role comparison.
    #[error("authentication required")]
    Unauthenticated,

    /// Principal is authenticated and not a superuser, but holds none of
    /// the roles the operation allows.
    #[error("user holds none of the required roles: {}", format_roles(.required))]
    RoleNotPermitted { required: Vec<CompanyRole> },

    /// Principal passed the role gate but failed a named ownership
    /// validator.
    #[error("{validator}: {detail}")]
    OwnershipDenied {
        validator: &'static str,
        detail: String,
    },

    /// A validator required a target identifier the extractor did not
    /// capture. Surfaced distinctly so a misconfigured validator/route
    /// pairing shows up in testing instead of masquerading as an
    /// ownership failure.
    #[error("{validator}: missing target identifier '{key}'")]
    AmbiguousTarget {
        validator: &'static str,
        key: &'static str,
    },
}

impl AccessError {
    pub fn ownership(validator: &'static str, detail: impl Into<String>) -> Self {
        Self::OwnershipDenied {
            validator,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> DenialKind {
        match self {
            AccessError::Unauthenticated => DenialKind::Unauthenticated,
            AccessError::RoleNotPermitted { .. } => DenialKind::RoleDenied,
            AccessError::OwnershipDenied { .. } => DenialKind::OwnershipDenied,
            AccessError::AmbiguousTarget { .. } => DenialKind::AmbiguousTarget,
        }
    }

    /// Structured payload for the transport layer.
    pub fn to_denial(&self) -> AccessDenial {
        AccessDenial {
            status_kind: self.kind(),
            detail: self.to_string(),
        }
    }
}

/// Coarse denial discriminant for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    RoleDenied,
    OwnershipDenied,
    AmbiguousTarget,
}

/// Outbound denial body: the two fields the engine guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDenial {
    pub status_kind: DenialKind,
    pub detail: String,
}

fn format_roles(roles: &[CompanyRole]) -> String {
    if roles.is_empty() {
        return "(none)".to_string();
    }
    let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
    names.join(", ")
}
