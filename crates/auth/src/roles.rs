//! Company-scoped role identities.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crewgate_core::DomainError;

/// Role a user can hold within a company.
///
/// The role universe is closed: policies match by exhaustive variant
/// comparison, so a misspelled role name cannot silently create an
/// unreachable policy. Unknown names fail to parse and never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyRole {
    Admin,
    ProductManager,
    TechSupport,
    Moderator,
}

impl CompanyRole {
    /// Every role the system knows about.
    pub const ALL: [CompanyRole; 4] = [
        CompanyRole::Admin,
        CompanyRole::ProductManager,
        CompanyRole::TechSupport,
        CompanyRole::Moderator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyRole::Admin => "admin",
            CompanyRole::ProductManager => "product_manager",
            CompanyRole::TechSupport => "tech_support",
            CompanyRole::Moderator => "moderator",
        }
    }
}

impl core::fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompanyRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown role: {s}")))
    }
}
