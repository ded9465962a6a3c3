//! Domain types representing budget categories.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categorises budget activity inside a single accounting window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    /// Start date of the window this category belongs to.
    pub period_start_date: NaiveDate,
    pub budget_amount: f64,
    pub recurring: bool,
    pub realized: bool,
    pub shared: bool,
    pub kids: bool,
    pub investment: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_members: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_children: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_grants: Vec<Uuid>,
}

impl BudgetCategory {
    pub fn new(
        name: impl Into<String>,
        kind: CategoryKind,
        period_start_date: NaiveDate,
        budget_amount: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            period_start_date,
            budget_amount,
            recurring: false,
            realized: false,
            shared: false,
            kids: false,
            investment: false,
            assigned_members: Vec::new(),
            assigned_children: Vec::new(),
            access_grants: Vec::new(),
        }
    }

    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }

    /// Copy of this category scoped to another window: fresh id, `realized`
    /// cleared, everything else preserved.
    pub fn carry_to(&self, period_start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            period_start_date,
            realized: false,
            ..self.clone()
        }
    }

    /// Categories match across windows on normalized name plus kind.
    pub fn matches(&self, name: &str, kind: CategoryKind) -> bool {
        self.kind == kind && self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryKind {
    Expense,
    Income,
    Savings,
}
