pub mod authz;
pub mod errors;
pub mod models;
pub mod repository;

// Re-export the vocabulary shared with calling layers
pub use authz::{
    actions, Action, ActionKind, Actor, AuthorizationGateway, CapabilityTable, ClientRef,
    ContractRef, Decision, DenyReason, EnforcementMode, EventRef, OwnershipResolver, PolicyEngine,
    Resource, ResourceKind, Role, UserRef,
};
pub use errors::{AuthzError, AuthzResult};
