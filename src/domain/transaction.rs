use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated entry belonging to exactly one budget category. `fixed`
/// transactions participate in forward replication; `realized` marks actual
/// spending as opposed to planned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub fixed: bool,
    pub realized: bool,
}

impl Transaction {
    pub fn new(category_id: Uuid, date: NaiveDate, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            date,
            amount,
            note: None,
            fixed: false,
            realized: false,
        }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn mark_realized(&mut self) {
        self.realized = true;
    }
}
