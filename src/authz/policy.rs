use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::errors::{AuthzError, AuthzResult};
use crate::repository::Repository;

use super::action::{Action, ActionKind, ResourceKind};
use super::actor::{Actor, Role};
use super::ownership::OwnershipResolver;
use super::resource::{ClientRef, ContractRef, EventRef, Resource};

/// Which rule a denial came from. The rendered strings are part of the
/// caller contract; UI messaging and audit logging key off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    RoleNotPermitted,
    NotLinkedToClient,
    ContractNotSigned,
    NotAssignedToEvent,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::RoleNotPermitted => "role not permitted",
            DenyReason::NotLinkedToClient => "not linked to this client",
            DenyReason::ContractNotSigned => "contract not signed",
            DenyReason::NotAssignedToEvent => "not assigned to this event",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one rule. Denial is a data result, not a
/// fault; only the gateway turns it into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }
}

/// Immutable role -> permitted-action mapping, built once at startup and
/// injected into [`PolicyEngine`]. Ownership scoping is layered on top
/// by the engine; a row here only says the role may attempt the action.
#[derive(Debug, Clone)]
pub struct CapabilityTable {
    grants: HashSet<(Role, ActionKind, ResourceKind)>,
}

impl CapabilityTable {
    pub fn empty() -> Self {
        Self {
            grants: HashSet::new(),
        }
    }

    /// The console's standard policy.
    pub fn standard() -> Self {
        use ActionKind::*;
        use ResourceKind::*;

        let mut table = Self::empty();

        table.grant(Role::Admin, Client, &[ViewAll, ViewOne, Create, Update]);
        table.grant(Role::Admin, Contract, &[ViewAll, ViewOne, Create, Update]);
        table.grant(
            Role::Admin,
            Event,
            &[ViewAll, ViewOne, Create, Update, AssignSupport, ViewUnassigned],
        );
        table.grant(Role::Admin, User, &[ViewAll, ViewOne, Create, Update]);

        // Managers administer contracts, events and users but no longer
        // create or edit clients.
        table.grant(Role::Manager, Client, &[ViewAll, ViewOne]);
        table.grant(Role::Manager, Contract, &[ViewAll, ViewOne, Create, Update]);
        table.grant(
            Role::Manager,
            Event,
            &[ViewAll, ViewOne, Update, AssignSupport, ViewUnassigned],
        );
        table.grant(Role::Manager, User, &[ViewAll, ViewOne, Create, Update]);

        // Sailor mutations are ownership-scoped by the engine.
        table.grant(Role::Sailor, Client, &[ViewAll, ViewOne, Create, Update]);
        table.grant(Role::Sailor, Contract, &[ViewAll, ViewOne, Update]);
        table.grant(Role::Sailor, Event, &[ViewAll, ViewOne, Create]);

        table.grant(Role::Support, Client, &[ViewAll, ViewOne]);
        table.grant(Role::Support, Contract, &[ViewAll, ViewOne]);
        table.grant(Role::Support, Event, &[ViewAll, ViewOne, Update]);

        table
    }

    pub fn grant(&mut self, role: Role, resource: ResourceKind, kinds: &[ActionKind]) {
        for kind in kinds {
            self.grants.insert((role, *kind, resource));
        }
    }

    pub fn allows(&self, role: Role, action: Action) -> bool {
        self.grants.contains(&(role, action.kind, action.resource))
    }

    /// Permitted action kinds for one (role, resource) row.
    pub fn row(&self, role: Role, resource: ResourceKind) -> Vec<ActionKind> {
        ActionKind::ALL
            .into_iter()
            .filter(|kind| self.allows(role, Action::new(*kind, resource)))
            .collect()
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// The decision core.
///
/// Evaluation order:
/// 1. capability table lookup (cheap, no I/O); unknown rows deny
/// 2. ownership scoping for the sailor/support rules that need it,
///    resolving the event -> contract -> client chain on demand
///
/// Checks that the table already denies never touch the resolver, so an
/// unauthorized role cannot probe for resource existence.
pub struct PolicyEngine {
    table: CapabilityTable,
    resolver: OwnershipResolver,
}

impl PolicyEngine {
    pub fn new(table: CapabilityTable, resolver: OwnershipResolver) -> Self {
        Self { table, resolver }
    }

    pub fn with_standard_policy(repo: Arc<dyn Repository>) -> Self {
        Self::new(CapabilityTable::standard(), OwnershipResolver::new(repo))
    }

    /// Decide whether `actor` may perform `action` on `resource`.
    ///
    /// `resource` is required only for ownership-scoped checks: the
    /// target `Client`/`Contract` for sailor updates, the target `Event`
    /// for support updates, and the parent `Contract` for sailor event
    /// creation (the event row does not exist yet at check time).
    /// Omitting or mismatching it there is a caller-contract violation,
    /// reported as [`AuthzError::InvalidCheck`] rather than a denial.
    pub async fn decide(
        &self,
        actor: &Actor,
        action: Action,
        resource: Option<&Resource>,
    ) -> AuthzResult<Decision> {
        if !self.table.allows(actor.role, action) {
            debug!(
                actor = %actor.username,
                role = %actor.role,
                action = %action,
                "capability denied"
            );
            return Ok(Decision::Deny(DenyReason::RoleNotPermitted));
        }

        let decision = self.ownership_decision(actor, action, resource).await?;
        match decision {
            Decision::Allow => {
                debug!(actor = %actor.username, action = %action, "allowed");
            }
            Decision::Deny(reason) => {
                debug!(actor = %actor.username, action = %action, %reason, "ownership denied");
            }
        }
        Ok(decision)
    }

    async fn ownership_decision(
        &self,
        actor: &Actor,
        action: Action,
        resource: Option<&Resource>,
    ) -> AuthzResult<Decision> {
        match (actor.role, action.kind, action.resource) {
            (Role::Sailor, ActionKind::Update, ResourceKind::Client) => {
                let client = expect_client(action, resource)?;
                Ok(linked_to(actor, &client.marketing_contact_username))
            }
            (Role::Sailor, ActionKind::Update, ResourceKind::Contract) => {
                let contract = expect_contract(action, resource)?;
                let client = self.resolver.client_of_contract(contract).await?;
                Ok(linked_to(actor, &client.marketing_contact_username))
            }
            (Role::Sailor, ActionKind::Create, ResourceKind::Event) => {
                let contract = expect_contract(action, resource)?;
                let client = self.resolver.client_of_contract(contract).await?;
                if client.marketing_contact_username != actor.username {
                    return Ok(Decision::Deny(DenyReason::NotLinkedToClient));
                }
                if !contract.is_signed {
                    return Ok(Decision::Deny(DenyReason::ContractNotSigned));
                }
                Ok(Decision::Allow)
            }
            (Role::Support, ActionKind::Update, ResourceKind::Event) => {
                let event = expect_event(action, resource)?;
                if event.assigned_support_id == Some(actor.id) {
                    Ok(Decision::Allow)
                } else {
                    Ok(Decision::Deny(DenyReason::NotAssignedToEvent))
                }
            }
            _ => Ok(Decision::Allow),
        }
    }
}

fn linked_to(actor: &Actor, marketing_contact: &str) -> Decision {
    if marketing_contact == actor.username {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::NotLinkedToClient)
    }
}

fn expect_client<'a>(action: Action, resource: Option<&'a Resource>) -> AuthzResult<&'a ClientRef> {
    match resource {
        Some(Resource::Client(client)) => Ok(client),
        Some(other) => Err(mismatched(action, ResourceKind::Client, other)),
        None => Err(missing(action)),
    }
}

fn expect_contract<'a>(
    action: Action,
    resource: Option<&'a Resource>,
) -> AuthzResult<&'a ContractRef> {
    match resource {
        Some(Resource::Contract(contract)) => Ok(contract),
        Some(other) => Err(mismatched(action, ResourceKind::Contract, other)),
        None => Err(missing(action)),
    }
}

fn expect_event<'a>(action: Action, resource: Option<&'a Resource>) -> AuthzResult<&'a EventRef> {
    match resource {
        Some(Resource::Event(event)) => Ok(event),
        Some(other) => Err(mismatched(action, ResourceKind::Event, other)),
        None => Err(missing(action)),
    }
}

fn missing(action: Action) -> AuthzError {
    AuthzError::invalid_check(format!("{action} requires a resource"))
}

fn mismatched(action: Action, wanted: ResourceKind, got: &Resource) -> AuthzError {
    AuthzError::invalid_check(format!(
        "{action} requires a {wanted} resource, got {}",
        got.kind()
    ))
}
