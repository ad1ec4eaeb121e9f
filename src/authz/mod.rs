//! Authorization core - capability table, policy engine, gateway
//!
//! Decides, for an authenticated [`Actor`] and an (action, resource)
//! pair, whether the operation is allowed:
//! - per-role, per-resource capability table (checked first, no I/O)
//! - ownership-scoped rules for sailor and support mutations, resolved
//!   through the event -> contract -> client chain
//! - configurable enforcement modes (off/advisory/strict)

pub mod action;
pub mod actor;
pub mod gateway;
pub mod ownership;
pub mod policy;
pub mod resource;

pub use action::{actions, Action, ActionKind, ResourceKind};
pub use actor::{Actor, Role};
pub use gateway::AuthorizationGateway;
pub use ownership::OwnershipResolver;
pub use policy::{CapabilityTable, Decision, DenyReason, PolicyEngine};
pub use resource::{ClientRef, ContractRef, EventRef, Resource, UserRef};

use std::sync::OnceLock;

/// Authorization enforcement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforcementMode {
    /// No permission checks (development mode)
    Off,
    /// Log denials but allow the operation (rollout mode)
    Advisory,
    /// Fail denied operations (the default)
    Strict,
}

impl EnforcementMode {
    pub fn from_env() -> Self {
        static MODE: OnceLock<EnforcementMode> = OnceLock::new();
        *MODE.get_or_init(|| {
            match std::env::var("AUTHZ_MODE")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "off" => EnforcementMode::Off,
                "advisory" => EnforcementMode::Advisory,
                _ => EnforcementMode::Strict,
            }
        })
    }
}
