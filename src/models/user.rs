use serde::{Deserialize, Serialize};

use crate::authz::actor::{Actor, Role};
use crate::authz::resource::UserRef;

/// A collaborator account. Credentials live with the authentication
/// collaborator; the core only needs identity and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// The session identity handed to controllers after authentication.
    pub fn to_actor(&self) -> Actor {
        Actor::new(self.id, self.username.clone(), self.role)
    }

    pub fn to_ref(&self) -> UserRef {
        UserRef { id: self.id }
    }
}
