use std::sync::Arc;

use tracing::warn;

use crate::errors::{AuthzError, AuthzResult};
use crate::repository::Repository;

use super::resource::{ClientRef, ContractRef, EventRef};

/// Resolves the event -> contract -> client ownership chain.
///
/// Every call is a fresh read-through to the repository; nothing is
/// cached across decisions, since signed status and ownership can change
/// between checks. A missing parent row (possible under concurrent
/// deletion, despite the FK invariants) surfaces as
/// [`AuthzError::NotFound`], never as a denial.
#[derive(Clone)]
pub struct OwnershipResolver {
    repo: Arc<dyn Repository>,
}

impl OwnershipResolver {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn client_of_contract(&self, contract: &ContractRef) -> AuthzResult<ClientRef> {
        let client = self
            .repo
            .find_client_by_id(contract.client_id)
            .await?
            .ok_or_else(|| {
                warn!(
                    contract_id = contract.id,
                    client_id = contract.client_id,
                    "contract references a missing client"
                );
                AuthzError::not_found("client", contract.client_id)
            })?;
        Ok(client.to_ref())
    }

    pub async fn contract_of_event(&self, event: &EventRef) -> AuthzResult<ContractRef> {
        let contract = self
            .repo
            .find_contract_by_id(event.contract_id)
            .await?
            .ok_or_else(|| {
                warn!(
                    event_id = event.id,
                    contract_id = event.contract_id,
                    "event references a missing contract"
                );
                AuthzError::not_found("contract", event.contract_id)
            })?;
        Ok(contract.to_ref())
    }

    /// Both hops of the chain; no partial resolution is observable.
    pub async fn client_of_event(&self, event: &EventRef) -> AuthzResult<ClientRef> {
        let contract = self.contract_of_event(event).await?;
        self.client_of_contract(&contract).await
    }
}
