//! Read-only projections of the domain entities, carrying only the
//! fields the rules look at. Refs are built from freshly queried
//! entities immediately before a check and are never cached; a stale
//! `is_signed` or reassigned marketing contact must not leak into a
//! decision.

use serde::{Deserialize, Serialize};

use super::action::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: i64,
    /// Username of the sales contact who owns the relationship.
    pub marketing_contact_username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    pub id: i64,
    pub client_id: i64,
    pub is_signed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub id: i64,
    pub contract_id: i64,
    pub assigned_support_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
}

/// The target of an ownership-scoped check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resource {
    Client(ClientRef),
    Contract(ContractRef),
    Event(EventRef),
    User(UserRef),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Client(_) => ResourceKind::Client,
            Resource::Contract(_) => ResourceKind::Contract,
            Resource::Event(_) => ResourceKind::Event,
            Resource::User(_) => ResourceKind::User,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Resource::Client(c) => c.id,
            Resource::Contract(c) => c.id,
            Resource::Event(e) => e.id,
            Resource::User(u) => u.id,
        }
    }
}
