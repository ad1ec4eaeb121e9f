use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::authz::resource::EventRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub contract_id: i64,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub location: String,
    pub attendees: u32,
    #[serde(default)]
    pub notes: Option<String>,
    /// Support user responsible for running the event, once assigned.
    #[serde(default)]
    pub assigned_support_id: Option<i64>,
}

impl Event {
    pub fn to_ref(&self) -> EventRef {
        EventRef {
            id: self.id,
            contract_id: self.contract_id,
            assigned_support_id: self.assigned_support_id,
        }
    }
}
