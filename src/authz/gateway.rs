use tracing::warn;

use crate::errors::{AuthzError, AuthzResult};

use super::action::Action;
use super::actor::Actor;
use super::policy::{Decision, PolicyEngine};
use super::resource::Resource;
use super::EnforcementMode;

/// The single enforcement entry point.
///
/// Controllers call [`check`](Self::check) before every guarded
/// operation and never read the capability table themselves; callers
/// that only need a non-failing answer (menu rendering) go through
/// [`engine`](Self::engine) and [`PolicyEngine::decide`].
pub struct AuthorizationGateway {
    engine: PolicyEngine,
    mode: EnforcementMode,
}

impl AuthorizationGateway {
    /// A strictly-enforcing gateway. `Advisory`/`Off` must be opted into
    /// via [`from_env`](Self::from_env) or [`with_mode`](Self::with_mode).
    pub fn new(engine: PolicyEngine) -> Self {
        Self::with_mode(engine, EnforcementMode::Strict)
    }

    pub fn from_env(engine: PolicyEngine) -> Self {
        Self::with_mode(engine, EnforcementMode::from_env())
    }

    pub fn with_mode(engine: PolicyEngine, mode: EnforcementMode) -> Self {
        Self { engine, mode }
    }

    pub fn engine(&self) -> &PolicyEngine {
        &self.engine
    }

    /// Fails with [`AuthzError::Denied`] when the engine denies;
    /// otherwise a side-effect-free pass-through. The guarded operation
    /// must follow immediately; any gap between check and use is the
    /// storage layer's problem to close, not ours to paper over.
    pub async fn check(
        &self,
        actor: &Actor,
        action: Action,
        resource: Option<&Resource>,
    ) -> AuthzResult<()> {
        if self.mode == EnforcementMode::Off {
            return Ok(());
        }

        match self.engine.decide(actor, action, resource).await? {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                warn!(
                    actor = %actor.username,
                    role = %actor.role,
                    action = %action,
                    resource_id = ?resource.map(Resource::id),
                    %reason,
                    advisory = self.mode == EnforcementMode::Advisory,
                    "authorization denied"
                );
                if self.mode == EnforcementMode::Advisory {
                    Ok(())
                } else {
                    Err(AuthzError::Denied(reason))
                }
            }
        }
    }
}
