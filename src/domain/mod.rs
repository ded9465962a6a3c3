//! Domain types for period accounting: cadences, configurations, windows,
//! categories, transactions, and the per-family aggregate.

pub mod cadence;
pub mod category;
pub mod config;
pub mod family;
pub mod period;
pub mod transaction;

pub use cadence::Cadence;
pub use category::{BudgetCategory, CategoryKind};
pub use config::PeriodConfiguration;
pub use family::FamilyLedger;
pub use period::{DateWindow, PeriodRecord, PeriodSummary, PeriodWindow};
pub use transaction::Transaction;
