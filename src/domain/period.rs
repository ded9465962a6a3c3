use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cadence::Cadence;

/// Inclusive date range covered by one accounting window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Materialized ledger entry for a window. Created lazily on first touch;
/// boundaries are canonical once written and only the most recent record may
/// change, via the migrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodRecord {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cadence: Cadence,
    pub currency: String,
}

impl PeriodRecord {
    pub fn new(window: DateWindow, cadence: Cadence, currency: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date: window.start,
            end_date: window.end,
            cadence,
            currency: currency.into(),
        }
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }
}

/// Resolved window returned to callers, with a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

/// One row of the available-periods listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
    pub is_current: bool,
    pub has_data: bool,
}
