use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    category::BudgetCategory, config::PeriodConfiguration, period::DateWindow,
    period::PeriodRecord, transaction::Transaction,
};

pub(crate) const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Aggregate of one family's period configuration, materialized period
/// records, budget categories, and transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyLedger {
    pub id: Uuid,
    pub name: String,
    pub configuration: PeriodConfiguration,
    #[serde(default)]
    pub periods: Vec<PeriodRecord>,
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "FamilyLedger::schema_version_default")]
    pub schema_version: u8,
}

impl FamilyLedger {
    pub fn new(name: impl Into<String>, configuration: PeriodConfiguration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            configuration,
            periods: Vec::new(),
            categories: Vec::new(),
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_period(&mut self, record: PeriodRecord) -> Uuid {
        let id = record.id;
        self.periods.push(record);
        self.touch();
        id
    }

    pub fn add_category(&mut self, category: BudgetCategory) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    /// Materialized record starting exactly on `start`, if any.
    pub fn period_at(&self, start: NaiveDate) -> Option<&PeriodRecord> {
        self.periods.iter().find(|p| p.start_date == start)
    }

    pub fn period_at_mut(&mut self, start: NaiveDate) -> Option<&mut PeriodRecord> {
        self.periods.iter_mut().find(|p| p.start_date == start)
    }

    /// Materialized record whose boundaries contain `date`, if any.
    pub fn period_containing(&self, date: NaiveDate) -> Option<&PeriodRecord> {
        self.periods.iter().find(|p| p.window().contains(date))
    }

    pub fn remove_period(&mut self, start: NaiveDate) -> bool {
        let before = self.periods.len();
        self.periods.retain(|p| p.start_date != start);
        let removed = self.periods.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Categories scoped to the window starting on `start`.
    pub fn categories_in(&self, start: NaiveDate) -> impl Iterator<Item = &BudgetCategory> {
        self.categories
            .iter()
            .filter(move |c| c.period_start_date == start)
    }

    pub fn category(&self, id: Uuid) -> Option<&BudgetCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn transactions_for(&self, category_id: Uuid) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.category_id == category_id)
    }

    /// True when the window has any category or dated transaction.
    pub fn window_has_data(&self, window: DateWindow) -> bool {
        self.categories_in(window.start).next().is_some()
            || self.transactions.iter().any(|t| window.contains(t.date))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
