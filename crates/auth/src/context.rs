//! Per-call context: declared arguments and extracted target identifiers.
//!
//! The call site (route handler, job, command dispatcher) declares its
//! arguments explicitly in a [`CallArgs`] value; there is no runtime
//! reflection over the protected operation. Which arguments denote target
//! objects is still decided by the naming convention the routes already
//! follow: a name starting with `pk`, ending with `pk`, or ending with `id`
//! is a target identifier.

use std::collections::BTreeMap;

use crewgate_core::{CompanyId, UserId};

use crate::principal::Principal;

/// Conventional key for the company being acted upon.
pub const COMPANY_PK: &str = "company_pk";
/// Conventional key for the user/employee being acted upon.
pub const USER_PK: &str = "user_pk";

/// A call argument value, as declared by the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Int(i64),
    Text(String),
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<UserId> for ArgValue {
    fn from(value: UserId) -> Self {
        Self::Int(value.get())
    }
}

impl From<CompanyId> for ArgValue {
    fn from(value: CompanyId) -> Self {
        Self::Int(value.get())
    }
}

/// The arguments of one invocation of a protected operation.
///
/// The principal slot is explicit: an absent principal means the request is
/// unauthenticated and the checker denies before any role comparison.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    principal: Option<Principal>,
    args: Vec<(&'static str, ArgValue)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn arg(mut self, name: &'static str, value: impl Into<ArgValue>) -> Self {
        self.args.push((name, value.into()));
        self
    }
}

/// Target identifiers extracted from one call, keyed by argument name.
///
/// Zero, one, or several entries are possible (nested resources pass e.g.
/// `company_pk` and `user_pk` together).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectIdentifiers(BTreeMap<&'static str, i64>);

impl ObjectIdentifiers {
    pub fn get(&self, key: &str) -> Option<i64> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_target_name(name: &str) -> bool {
    name.starts_with("pk") || name.ends_with("pk") || name.ends_with("id")
}

/// Locate the principal and the target identifiers for one invocation.
///
/// Integer-valued matches are captured directly; text values are coerced by
/// integer parse. A convention-named argument that does not coerce is not
/// captured, so a validator that requires it fails closed downstream.
pub fn extract(args: &CallArgs) -> (Option<&Principal>, ObjectIdentifiers) {
    let mut targets = BTreeMap::new();

    for (name, value) in &args.args {
        if !is_target_name(name) {
            continue;
        }
        match value {
            ArgValue::Int(v) => {
                targets.insert(*name, *v);
            }
            ArgValue::Text(s) => match s.parse::<i64>() {
                Ok(v) => {
                    targets.insert(*name, v);
                }
                Err(_) => {
                    tracing::debug!(name, value = %s, "target identifier is not an integer; skipped");
                }
            },
        }
    }

    (args.principal.as_ref(), ObjectIdentifiers(targets))
}
