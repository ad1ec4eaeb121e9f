use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AuthzError;

/// What an actor is trying to do, independent of the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ViewAll,
    #[serde(rename = "view")]
    ViewOne,
    Create,
    Update,
    AssignSupport,
    ViewUnassigned,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::ViewAll,
        ActionKind::ViewOne,
        ActionKind::Create,
        ActionKind::Update,
        ActionKind::AssignSupport,
        ActionKind::ViewUnassigned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ViewAll => "view_all",
            ActionKind::ViewOne => "view",
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::AssignSupport => "assign_support",
            ActionKind::ViewUnassigned => "view_unassigned",
        }
    }
}

/// The entity type a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Client,
    Contract,
    Event,
    User,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Client,
        ResourceKind::Contract,
        ResourceKind::Event,
        ResourceKind::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Client => "client",
            ResourceKind::Contract => "contract",
            ResourceKind::Event => "event",
            ResourceKind::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action kind crossed with its resource type, e.g. `client.update`.
///
/// The dotted rendering is the vocabulary shared with calling layers and
/// the `policycheck` tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub resource: ResourceKind,
}

impl Action {
    pub const fn new(kind: ActionKind, resource: ResourceKind) -> Self {
        Self { kind, resource }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource.as_str(), self.kind.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (resource, kind) = value
            .split_once('.')
            .ok_or_else(|| AuthzError::invalid_check(format!("malformed action: {value}")))?;

        let resource = match resource {
            "client" => ResourceKind::Client,
            "contract" => ResourceKind::Contract,
            "event" => ResourceKind::Event,
            "user" => ResourceKind::User,
            other => {
                return Err(AuthzError::invalid_check(format!("unknown resource: {other}")));
            }
        };

        let kind = match kind {
            "view_all" => ActionKind::ViewAll,
            "view" => ActionKind::ViewOne,
            "create" => ActionKind::Create,
            "update" => ActionKind::Update,
            "assign_support" => ActionKind::AssignSupport,
            "view_unassigned" => ActionKind::ViewUnassigned,
            other => {
                return Err(AuthzError::invalid_check(format!("unknown action kind: {other}")));
            }
        };

        Ok(Action::new(kind, resource))
    }
}

/// Well-known actions, by dotted name.
pub mod actions {
    use super::{Action, ActionKind, ResourceKind};

    pub const CLIENT_VIEW_ALL: Action = Action::new(ActionKind::ViewAll, ResourceKind::Client);
    pub const CLIENT_VIEW: Action = Action::new(ActionKind::ViewOne, ResourceKind::Client);
    pub const CLIENT_CREATE: Action = Action::new(ActionKind::Create, ResourceKind::Client);
    pub const CLIENT_UPDATE: Action = Action::new(ActionKind::Update, ResourceKind::Client);

    pub const CONTRACT_VIEW_ALL: Action = Action::new(ActionKind::ViewAll, ResourceKind::Contract);
    pub const CONTRACT_VIEW: Action = Action::new(ActionKind::ViewOne, ResourceKind::Contract);
    pub const CONTRACT_CREATE: Action = Action::new(ActionKind::Create, ResourceKind::Contract);
    pub const CONTRACT_UPDATE: Action = Action::new(ActionKind::Update, ResourceKind::Contract);

    pub const EVENT_VIEW_ALL: Action = Action::new(ActionKind::ViewAll, ResourceKind::Event);
    pub const EVENT_VIEW: Action = Action::new(ActionKind::ViewOne, ResourceKind::Event);
    pub const EVENT_CREATE: Action = Action::new(ActionKind::Create, ResourceKind::Event);
    pub const EVENT_UPDATE: Action = Action::new(ActionKind::Update, ResourceKind::Event);
    pub const EVENT_ASSIGN_SUPPORT: Action =
        Action::new(ActionKind::AssignSupport, ResourceKind::Event);
    pub const EVENT_VIEW_UNASSIGNED: Action =
        Action::new(ActionKind::ViewUnassigned, ResourceKind::Event);

    pub const USER_VIEW_ALL: Action = Action::new(ActionKind::ViewAll, ResourceKind::User);
    pub const USER_VIEW: Action = Action::new(ActionKind::ViewOne, ResourceKind::User);
    pub const USER_CREATE: Action = Action::new(ActionKind::Create, ResourceKind::User);
    pub const USER_UPDATE: Action = Action::new(ActionKind::Update, ResourceKind::User);
}
