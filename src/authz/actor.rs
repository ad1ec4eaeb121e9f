use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AuthzError;

/// Authority class of an authenticated user.
///
/// The set is closed and the permitted-action sets of `Manager` and
/// `Sailor` overlap without either containing the other, so roles are
/// never compared by rank; every rule goes through the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Sailor,
    Support,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Sailor, Role::Support];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Sailor => "sailor",
            Role::Support => "support",
        }
    }

}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "sailor" => Ok(Role::Sailor),
            "support" => Ok(Role::Support),
            other => Err(AuthzError::invalid_check(format!("unknown role: {other}"))),
        }
    }
}

/// The authenticated identity a check is evaluated for.
///
/// Built once per session by the authentication collaborator and treated
/// as a read-only input; the policy engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }
}
