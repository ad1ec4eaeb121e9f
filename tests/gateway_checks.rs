//! The gateway is the only layer that turns a Deny into an error, and
//! the enforcement mode decides whether it does so at all.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;

use spinnaker_authz::repository::{MemoryRepository, Repository};
use spinnaker_authz::{
    actions, Actor, AuthorizationGateway, AuthzError, ContractRef, DenyReason, EnforcementMode,
    EventRef, PolicyEngine, Resource, Role,
};

fn date(s: &str) -> NaiveDate {
    s.parse().expect("test date")
}

fn seeded_repo() -> MemoryRepository {
    let repo = MemoryRepository::new();
    repo.put_client(spinnaker_authz::models::Client {
        id: 9,
        name: "Kallista Events".into(),
        email: "contact@kallista.example".into(),
        phone: "+33712345678".into(),
        company: "Kallista SARL".into(),
        marketing_contact: "bob".into(),
        created_on: date("2025-03-01"),
        last_update: date("2025-06-15"),
    });
    repo.put_event(spinnaker_authz::models::Event {
        id: 5,
        name: "Kallista summer gala".into(),
        contract_id: 3,
        starts_on: date("2025-07-20"),
        ends_on: date("2025-07-21"),
        location: "Marseille".into(),
        attendees: 120,
        notes: None,
        assigned_support_id: None,
    });
    repo
}

fn strict_gateway() -> AuthorizationGateway {
    AuthorizationGateway::new(PolicyEngine::with_standard_policy(Arc::new(seeded_repo())))
}

#[tokio::test]
async fn strict_mode_raises_typed_denials() -> Result<()> {
    let gateway = strict_gateway();
    let manager = Actor::new(2, "mgr1", Role::Manager);

    // Managers cannot create clients in the final policy.
    let err = gateway
        .check(&manager, actions::CLIENT_CREATE, None)
        .await
        .unwrap_err();

    assert!(err.is_denied());
    assert_eq!(err.deny_reason(), Some(DenyReason::RoleNotPermitted));
    assert_eq!(err.to_string(), "permission denied: role not permitted");
    Ok(())
}

#[tokio::test]
async fn allowed_checks_pass_through_silently() -> Result<()> {
    let gateway = strict_gateway();
    let manager = Actor::new(2, "mgr1", Role::Manager);

    let repo = seeded_repo();
    let event = Resource::Event(repo.find_event_by_id(5).await?.expect("seeded").to_ref());
    gateway
        .check(&manager, actions::EVENT_ASSIGN_SUPPORT, Some(&event))
        .await?;
    Ok(())
}

#[tokio::test]
async fn advisory_mode_logs_and_allows() -> Result<()> {
    let engine = PolicyEngine::with_standard_policy(Arc::new(seeded_repo()));
    let gateway = AuthorizationGateway::with_mode(engine, EnforcementMode::Advisory);
    let support = Actor::new(4, "sam", Role::Support);

    // Denied under strict, waved through (with a warning) in advisory.
    gateway.check(&support, actions::CLIENT_CREATE, None).await?;
    Ok(())
}

#[tokio::test]
async fn advisory_mode_still_surfaces_integrity_errors() -> Result<()> {
    let engine = PolicyEngine::with_standard_policy(Arc::new(seeded_repo()));
    let gateway = AuthorizationGateway::with_mode(engine, EnforcementMode::Advisory);
    let sailor = Actor::new(7, "alice", Role::Sailor);

    // Dangling client id: not a denial, so advisory mode must not mask it.
    let orphan = Resource::Contract(ContractRef {
        id: 77,
        client_id: 404,
        is_signed: true,
    });
    let err = gateway
        .check(&sailor, actions::CONTRACT_UPDATE, Some(&orphan))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn off_mode_never_consults_the_engine() -> Result<()> {
    // An empty repository: any ownership resolution would fail NotFound.
    let engine = PolicyEngine::with_standard_policy(Arc::new(MemoryRepository::new()));
    let gateway = AuthorizationGateway::with_mode(engine, EnforcementMode::Off);
    let sailor = Actor::new(7, "alice", Role::Sailor);

    let contract = Resource::Contract(ContractRef {
        id: 1,
        client_id: 1,
        is_signed: false,
    });
    gateway
        .check(&sailor, actions::CONTRACT_UPDATE, Some(&contract))
        .await?;
    Ok(())
}

#[tokio::test]
async fn missing_resource_is_not_reported_as_denial() -> Result<()> {
    let gateway = strict_gateway();
    let sailor = Actor::new(7, "alice", Role::Sailor);

    let err = gateway
        .check(&sailor, actions::CLIENT_UPDATE, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::InvalidCheck(_)));
    assert!(!err.is_denied());
    Ok(())
}

#[tokio::test]
async fn callers_can_reach_the_non_failing_form() -> Result<()> {
    // Menu rendering needs a yes/no without an error path.
    let gateway = strict_gateway();
    let support = Actor::new(4, "sam", Role::Support);

    let decision = gateway
        .engine()
        .decide(&support, actions::EVENT_VIEW_ALL, None)
        .await?;
    assert!(decision.is_allowed());

    let denied = gateway
        .engine()
        .decide(&support, actions::USER_CREATE, None)
        .await?;
    assert_eq!(denied.deny_reason(), Some(DenyReason::RoleNotPermitted));
    Ok(())
}

#[tokio::test]
async fn sailor_event_update_remains_manager_territory() -> Result<()> {
    // Sailors create events; only managers, admins and assigned support
    // touch them afterwards.
    let gateway = strict_gateway();
    let sailor = Actor::new(7, "alice", Role::Sailor);
    let event = Resource::Event(EventRef {
        id: 5,
        contract_id: 3,
        assigned_support_id: None,
    });

    let err = gateway
        .check(&sailor, actions::EVENT_UPDATE, Some(&event))
        .await
        .unwrap_err();
    assert_eq!(err.deny_reason(), Some(DenyReason::RoleNotPermitted));
    Ok(())
}
