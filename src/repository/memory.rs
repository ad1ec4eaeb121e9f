use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Client, Contract, Event, User};

use super::Repository;

/// JSON fixture format consumed by [`MemoryRepository`] and the
/// `policycheck` tool. All sections are optional.
#[derive(Debug, Default, Deserialize)]
pub struct FixtureSet {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// In-memory [`Repository`] used by the fixture CLI and the test-suite.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    clients: BTreeMap<i64, Client>,
    contracts: BTreeMap<i64, Contract>,
    events: BTreeMap<i64, Event>,
    users: BTreeMap<i64, User>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: FixtureSet) -> Self {
        let repo = Self::new();
        for client in fixtures.clients {
            repo.put_client(client);
        }
        for contract in fixtures.contracts {
            repo.put_contract(contract);
        }
        for event in fixtures.events {
            repo.put_event(event);
        }
        for user in fixtures.users {
            repo.put_user(user);
        }
        repo
    }

    pub fn from_fixture_str(json: &str) -> anyhow::Result<Self> {
        let fixtures: FixtureSet =
            serde_json::from_str(json).context("failed to parse fixture JSON")?;
        Ok(Self::from_fixtures(fixtures))
    }

    pub fn from_fixture_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixtures from {}", path.display()))?;
        Self::from_fixture_str(&json)
    }

    pub fn put_client(&self, client: Client) {
        if let Ok(mut store) = self.inner.write() {
            store.clients.insert(client.id, client);
        }
    }

    pub fn put_contract(&self, contract: Contract) {
        if let Ok(mut store) = self.inner.write() {
            store.contracts.insert(contract.id, contract);
        }
    }

    pub fn put_event(&self, event: Event) {
        if let Ok(mut store) = self.inner.write() {
            store.events.insert(event.id, event);
        }
    }

    pub fn put_user(&self, user: User) {
        if let Ok(mut store) = self.inner.write() {
            store.users.insert(user.id, user);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Store) -> T) -> anyhow::Result<T> {
        let store = self.inner.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(f(&store))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Store) -> T) -> anyhow::Result<T> {
        let mut store = self.inner.write().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(f(&mut store))
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_client_by_id(&self, id: i64) -> anyhow::Result<Option<Client>> {
        self.read(|store| store.clients.get(&id).cloned())
    }

    async fn find_client_by_name(&self, name: &str) -> anyhow::Result<Option<Client>> {
        self.read(|store| store.clients.values().find(|c| c.name == name).cloned())
    }

    async fn find_contract_by_id(&self, id: i64) -> anyhow::Result<Option<Contract>> {
        self.read(|store| store.contracts.get(&id).cloned())
    }

    async fn find_event_by_id(&self, id: i64) -> anyhow::Result<Option<Event>> {
        self.read(|store| store.events.get(&id).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        self.read(|store| store.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        self.read(|store| store.users.values().find(|u| u.username == username).cloned())
    }

    async fn list_clients(&self) -> anyhow::Result<Vec<Client>> {
        self.read(|store| store.clients.values().cloned().collect())
    }

    async fn list_contracts(&self) -> anyhow::Result<Vec<Contract>> {
        self.read(|store| store.contracts.values().cloned().collect())
    }

    async fn list_events(&self) -> anyhow::Result<Vec<Event>> {
        self.read(|store| store.events.values().cloned().collect())
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.read(|store| store.users.values().cloned().collect())
    }

    async fn save_client(&self, client: Client) -> anyhow::Result<Client> {
        self.write(|store| {
            store.clients.insert(client.id, client.clone());
            client
        })
    }

    async fn save_contract(&self, contract: Contract) -> anyhow::Result<Contract> {
        self.write(|store| {
            store.contracts.insert(contract.id, contract.clone());
            contract
        })
    }

    async fn save_event(&self, event: Event) -> anyhow::Result<Event> {
        self.write(|store| {
            store.events.insert(event.id, event.clone());
            event
        })
    }

    async fn save_user(&self, user: User) -> anyhow::Result<User> {
        self.write(|store| {
            store.users.insert(user.id, user.clone());
            user
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::actor::Role;

    const FIXTURES: &str = r#"{
        "clients": [{
            "id": 9,
            "name": "Kallista Events",
            "email": "contact@kallista.example",
            "phone": "+33712345678",
            "company": "Kallista SARL",
            "marketing_contact": "bob",
            "created_on": "2025-03-01",
            "last_update": "2025-06-15"
        }],
        "contracts": [{
            "id": 3,
            "client_id": 9,
            "total_amount": 12000,
            "outstanding_amount": 4000,
            "created_on": "2025-04-02",
            "is_signed": true
        }],
        "events": [{
            "id": 5,
            "name": "Kallista summer gala",
            "contract_id": 3,
            "starts_on": "2025-07-20",
            "ends_on": "2025-07-21",
            "location": "Marseille",
            "attendees": 120,
            "assigned_support_id": 4
        }],
        "users": [{
            "id": 8,
            "username": "bob",
            "email": "bob@spinnaker.example",
            "role": "sailor"
        }]
    }"#;

    #[tokio::test]
    async fn fixture_str_loads_all_sections() -> anyhow::Result<()> {
        let repo = MemoryRepository::from_fixture_str(FIXTURES)?;

        let client = repo.find_client_by_id(9).await?.expect("client 9 seeded");
        assert_eq!(client.marketing_contact, "bob");

        let contract = repo.find_contract_by_id(3).await?.expect("contract 3 seeded");
        assert!(contract.is_signed);

        let event = repo.find_event_by_id(5).await?.expect("event 5 seeded");
        assert_eq!(event.assigned_support_id, Some(4));
        assert_eq!(event.notes, None);

        let user = repo
            .find_user_by_username("bob")
            .await?
            .expect("user bob seeded");
        assert_eq!(user.role, Role::Sailor);
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_by_id() -> anyhow::Result<()> {
        let repo = MemoryRepository::from_fixture_str(FIXTURES)?;

        let mut contract = repo.find_contract_by_id(3).await?.expect("seeded");
        contract.outstanding_amount = 0;
        repo.save_contract(contract).await?;

        let reread = repo.find_contract_by_id(3).await?.expect("still there");
        assert_eq!(reread.outstanding_amount, 0);
        assert_eq!(repo.list_contracts().await?.len(), 1);
        Ok(())
    }

    #[test]
    fn malformed_fixture_is_rejected() {
        assert!(MemoryRepository::from_fixture_str("{\"clients\": 3}").is_err());
    }
}
