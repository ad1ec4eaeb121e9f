//! Storage collaborator seam.
//!
//! Persistence lives outside the core; the engine and its callers only
//! depend on this trait. Backends report failures as opaque
//! `anyhow::Error`s, which the core wraps into
//! [`AuthzError::Repository`](crate::errors::AuthzError).

use async_trait::async_trait;

use crate::models::{Client, Contract, Event, User};

pub mod memory;

pub use memory::{FixtureSet, MemoryRepository};

#[async_trait]
pub trait Repository: Send + Sync {
    async fn find_client_by_id(&self, id: i64) -> anyhow::Result<Option<Client>>;
    async fn find_client_by_name(&self, name: &str) -> anyhow::Result<Option<Client>>;
    async fn find_contract_by_id(&self, id: i64) -> anyhow::Result<Option<Contract>>;
    async fn find_event_by_id(&self, id: i64) -> anyhow::Result<Option<Event>>;
    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    async fn list_clients(&self) -> anyhow::Result<Vec<Client>>;
    async fn list_contracts(&self) -> anyhow::Result<Vec<Contract>>;
    async fn list_events(&self) -> anyhow::Result<Vec<Event>>;
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;

    async fn save_client(&self, client: Client) -> anyhow::Result<Client>;
    async fn save_contract(&self, contract: Contract) -> anyhow::Result<Contract>;
    async fn save_event(&self, event: Event) -> anyhow::Result<Event>;
    async fn save_user(&self, user: User) -> anyhow::Result<User>;
}
