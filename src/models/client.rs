use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::authz::resource::ClientRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    /// Username of the sales contact linked to this client. Ownership
    /// rules compare it against the acting sailor's username.
    pub marketing_contact: String,
    pub created_on: NaiveDate,
    pub last_update: NaiveDate,
}

impl Client {
    /// Authorization projection, built fresh for each check.
    pub fn to_ref(&self) -> ClientRef {
        ClientRef {
            id: self.id,
            marketing_contact_username: self.marketing_contact.clone(),
        }
    }
}
