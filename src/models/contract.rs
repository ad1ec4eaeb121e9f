use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::authz::resource::ContractRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: i64,
    pub client_id: i64,
    /// Amounts in whole currency units, as the console stores them.
    pub total_amount: i64,
    pub outstanding_amount: i64,
    pub created_on: NaiveDate,
    pub is_signed: bool,
}

impl Contract {
    pub fn to_ref(&self) -> ContractRef {
        ContractRef {
            id: self.id,
            client_id: self.client_id,
            is_signed: self.is_signed,
        }
    }
}
