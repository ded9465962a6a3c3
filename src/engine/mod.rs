//! Period engine: boundary calculation, the materialized period ledger,
//! configuration-change analysis and migration, and recurring replication.

pub mod calculator;
mod carryover;
pub mod facade;
pub mod impact;
pub mod ledger;
pub mod migrator;
pub mod replicator;

pub use calculator::PeriodCalculator;
pub use facade::PeriodEngine;
pub use impact::{ConfigurationImpactAnalyzer, Impact};
pub use ledger::PeriodLedger;
pub use migrator::{MigrationResult, PeriodMigrator};
pub use replicator::{RecurringReplicator, ReplicationResult};

use crate::domain::Cadence;
use crate::errors::StoreError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("anchor day {0} is outside the valid range 1..=31")]
    AnchorOutOfRange(u32),
    #[error("{0} cadence requires a base date")]
    MissingBaseDate(Cadence),
    #[error("{0}")]
    Invalid(String),
}
