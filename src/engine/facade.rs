use chrono::{NaiveDate, Utc};

use crate::domain::{FamilyLedger, PeriodConfiguration, PeriodSummary, PeriodWindow};
use crate::storage::FamilyStore;

use super::{
    calculator::PeriodCalculator,
    impact::{ConfigurationImpactAnalyzer, Impact},
    ledger::PeriodLedger,
    migrator::{MigrationResult, PeriodMigrator},
    replicator::{RecurringReplicator, ReplicationResult},
    EngineResult,
};

/// Facade coordinating family state, the period engine, and persistence.
/// Stateless between calls: every operation loads fresh, mutates in memory,
/// and persists atomically on success.
pub struct PeriodEngine {
    storage: Box<dyn FamilyStore>,
}

impl PeriodEngine {
    pub fn new(storage: Box<dyn FamilyStore>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &dyn FamilyStore {
        self.storage.as_ref()
    }

    pub fn create_family(
        &self,
        name: &str,
        configuration: PeriodConfiguration,
    ) -> EngineResult<FamilyLedger> {
        PeriodCalculator::validate(&configuration)?;
        let family = FamilyLedger::new(name, configuration);
        self.storage.save(&family, name)?;
        Ok(family)
    }

    /// Window containing `reference` (or today), materialized record winning
    /// over recomputation.
    pub fn resolve_period(
        &self,
        family: &str,
        reference: Option<NaiveDate>,
    ) -> EngineResult<PeriodWindow> {
        let family = self.load(family)?;
        PeriodLedger::resolve_window(&family, reference.unwrap_or_else(Self::today))
    }

    /// Known windows, most recent first, flagged current / has-data.
    pub fn list_available_periods(&self, family: &str) -> EngineResult<Vec<PeriodSummary>> {
        let family = self.load(family)?;
        PeriodLedger::list_available(&family, Self::today())
    }

    /// Dry run: what would adopting `new_config` do to the open window?
    /// Mutates nothing; callers confirm before [`apply_config_change`](Self::apply_config_change).
    pub fn analyze_config_change(
        &self,
        family: &str,
        new_config: &PeriodConfiguration,
    ) -> EngineResult<Impact> {
        let family = self.load(family)?;
        ConfigurationImpactAnalyzer::analyze(&family, new_config, Self::today())
    }

    /// Applies a confirmed impact and persists the migrated state.
    pub fn apply_config_change(
        &self,
        family: &str,
        new_config: &PeriodConfiguration,
        impact: &Impact,
    ) -> EngineResult<MigrationResult> {
        let name = family;
        let mut family = self.load(name)?;
        let result = PeriodMigrator::apply(&mut family, new_config, impact)?;
        self.storage.save(&family, name)?;
        Ok(result)
    }

    /// First-access replication of recurring data into a window.
    pub fn ensure_recurring_data(
        &self,
        family: &str,
        period_start: NaiveDate,
    ) -> EngineResult<ReplicationResult> {
        let name = family;
        let mut family = self.load(name)?;
        let result = RecurringReplicator::ensure(&mut family, period_start)?;
        self.storage.save(&family, name)?;
        Ok(result)
    }

    fn load(&self, name: &str) -> EngineResult<FamilyLedger> {
        let report = self.storage.load(name)?;
        for note in &report.migrations {
            tracing::warn!(family = name, "{note}");
        }
        Ok(report.family)
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}
