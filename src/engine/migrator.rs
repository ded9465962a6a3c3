use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::domain::{DateWindow, FamilyLedger, PeriodConfiguration, PeriodRecord};

use super::{
    carryover::{carry_category, move_transactions_in_window},
    impact::Impact,
    EngineResult,
};

/// Counters describing what a migration actually did. Re-applying the same
/// impact yields all zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationResult {
    pub periods_created: usize,
    pub categories_copied: usize,
    pub transactions_moved: usize,
    pub future_transactions_reanchored: usize,
}

/// Applies an accepted [`Impact`]: record surgery on the open window,
/// category carry-forward, transaction relocation, and adoption of the new
/// configuration. Every step checks existence first, so the whole operation
/// is safely repeatable.
pub struct PeriodMigrator;

impl PeriodMigrator {
    pub fn apply(
        family: &mut FamilyLedger,
        new_config: &PeriodConfiguration,
        impact: &Impact,
    ) -> EngineResult<MigrationResult> {
        let mut result = MigrationResult::default();
        let old_start = impact.current_period.start;
        let new_window = impact.new_current_period;

        // 1. Reanchor overflow: anything dated past the new window's end
        //    lands on the new window's start.
        for txn in &mut family.transactions {
            if txn.date > new_window.end {
                txn.date = new_window.start;
                result.future_transactions_reanchored += 1;
            }
        }

        if let Some(adjustment) = impact.adjustment_period {
            // 2. The adjustment window shares its start with the open window,
            //    so it is realized by shortening that record in place.
            match family.period_at_mut(adjustment.start) {
                Some(record) => record.end_date = adjustment.end,
                None => {
                    let cadence = family.configuration.cadence;
                    let currency = family.configuration.currency.clone();
                    family.add_period(PeriodRecord::new(adjustment, cadence, currency));
                    result.periods_created += 1;
                }
            }
            Self::carry_window_forward(family, old_start, adjustment, &mut result);
        } else if impact.requires_close && new_window.start != old_start {
            // 3. Boundaries merely shifted. The closed-short window still
            //    needs a record, so its categories keep a period to belong to.
            if new_window.start > old_start {
                let closed_end = new_window.start - Duration::days(1);
                match family.period_at_mut(old_start) {
                    Some(record) => record.end_date = closed_end,
                    None => {
                        let cadence = family.configuration.cadence;
                        let currency = family.configuration.currency.clone();
                        family.add_period(PeriodRecord::new(
                            DateWindow::new(old_start, closed_end),
                            cadence,
                            currency,
                        ));
                        result.periods_created += 1;
                    }
                }
            } else {
                // The new window supersedes the open record entirely. No
                // record will ever start on `old_start` under the new tiling,
                // so its categories move to the new start with their
                // transactions still attached.
                family.remove_period(old_start);
                Self::rescope_window(family, old_start, new_window.start);
            }
        }

        // 4. Materialize the new current record under the new configuration.
        match family.period_at_mut(new_window.start) {
            Some(record) => {
                record.end_date = new_window.end;
                record.cadence = new_config.cadence;
            }
            None => {
                let record =
                    PeriodRecord::new(new_window, new_config.cadence, new_config.currency.clone());
                family.add_period(record);
                result.periods_created += 1;
            }
        }
        Self::carry_window_forward(family, old_start, new_window, &mut result);

        family.configuration = new_config.clone();
        family.touch();
        tracing::info!(
            periods = result.periods_created,
            categories = result.categories_copied,
            moved = result.transactions_moved,
            reanchored = result.future_transactions_reanchored,
            "applied period configuration change"
        );
        Ok(result)
    }

    /// Moves every category of a vanished window start onto `new_start`.
    /// A category whose (name, kind) twin already lives there is merged into
    /// the twin instead: its transactions are reassigned and the duplicate
    /// removed.
    fn rescope_window(family: &mut FamilyLedger, old_start: NaiveDate, new_start: NaiveDate) {
        let ids: Vec<Uuid> = family.categories_in(old_start).map(|c| c.id).collect();
        for id in ids {
            let Some(source) = family.category(id) else {
                continue;
            };
            let (name, kind) = (source.name.clone(), source.kind);
            let twin = family
                .categories_in(new_start)
                .find(|c| c.id != id && c.matches(&name, kind))
                .map(|c| c.id);
            match twin {
                Some(target) => {
                    for txn in &mut family.transactions {
                        if txn.category_id == id {
                            txn.category_id = target;
                        }
                    }
                    family.categories.retain(|c| c.id != id);
                }
                None => {
                    if let Some(category) =
                        family.categories.iter_mut().find(|c| c.id == id)
                    {
                        category.period_start_date = new_start;
                    }
                }
            }
        }
    }

    /// Copies every category of the window starting at `source_start` into
    /// `target`, skipping ones already present, and moves transactions dated
    /// inside `target` onto the copies.
    fn carry_window_forward(
        family: &mut FamilyLedger,
        source_start: NaiveDate,
        target: DateWindow,
        result: &mut MigrationResult,
    ) {
        if source_start == target.start {
            return;
        }
        let sources: Vec<Uuid> = family
            .categories_in(source_start)
            .map(|c| c.id)
            .collect();
        for source_id in sources {
            let Some(carried) = carry_category(family, source_id, target.start) else {
                continue;
            };
            if carried.created {
                result.categories_copied += 1;
            }
            result.transactions_moved +=
                move_transactions_in_window(family, source_id, carried.target_id, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BudgetCategory, CategoryKind, DateWindow, Transaction};
    use crate::engine::impact::ConfigurationImpactAnalyzer;
    use crate::engine::ledger::PeriodLedger;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_family() -> (FamilyLedger, Uuid) {
        let mut family =
            FamilyLedger::new("Smith", PeriodConfiguration::monthly(1, "USD"));
        let window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 31));
        PeriodLedger::get_or_create(&mut family, window);
        let category_id = family.add_category(
            BudgetCategory::new("Groceries", CategoryKind::Expense, window.start, 400.0)
                .recurring(),
        );
        (family, category_id)
    }

    #[test]
    fn anchor_shift_closes_short_and_relocates_data() {
        let (mut family, category_id) = monthly_family();
        let inside = family.add_transaction(Transaction::new(
            category_id,
            date(2024, 3, 20),
            55.0,
        ));
        let overflow = family.add_transaction(Transaction::new(
            category_id,
            date(2024, 4, 20),
            75.0,
        ));

        let new_config = PeriodConfiguration::monthly(15, "USD");
        let impact =
            ConfigurationImpactAnalyzer::analyze(&family, &new_config, date(2024, 3, 10))
                .unwrap();
        let result = PeriodMigrator::apply(&mut family, &new_config, &impact).unwrap();

        assert_eq!(result.periods_created, 1);
        assert_eq!(result.categories_copied, 1);
        assert_eq!(result.transactions_moved, 2);
        assert_eq!(result.future_transactions_reanchored, 1);

        let old_record = family.period_at(date(2024, 3, 1)).unwrap();
        assert_eq!(old_record.end_date, date(2024, 3, 14));
        let new_record = family.period_at(date(2024, 3, 15)).unwrap();
        assert_eq!(new_record.end_date, date(2024, 4, 14));

        let copy = family
            .categories_in(date(2024, 3, 15))
            .next()
            .expect("carried category");
        assert_eq!(copy.name, "Groceries");
        assert!(copy.recurring);
        assert!(!copy.realized);

        let moved = family
            .transactions
            .iter()
            .find(|t| t.id == inside)
            .unwrap();
        assert_eq!(moved.category_id, copy.id);
        let reanchored = family
            .transactions
            .iter()
            .find(|t| t.id == overflow)
            .unwrap();
        assert_eq!(reanchored.date, date(2024, 3, 15));
        assert_eq!(reanchored.category_id, copy.id);
        assert_eq!(family.configuration, new_config);
    }

    #[test]
    fn applying_the_same_impact_twice_changes_nothing() {
        let (mut family, category_id) = monthly_family();
        family.add_transaction(Transaction::new(category_id, date(2024, 3, 20), 55.0));

        let new_config = PeriodConfiguration::monthly(15, "USD");
        let impact =
            ConfigurationImpactAnalyzer::analyze(&family, &new_config, date(2024, 3, 10))
                .unwrap();
        PeriodMigrator::apply(&mut family, &new_config, &impact).unwrap();
        let snapshot = (
            family.periods.clone(),
            family.categories.clone(),
            family
                .transactions
                .iter()
                .map(|t| (t.id, t.category_id, t.date))
                .collect::<Vec<_>>(),
        );

        let rerun = PeriodMigrator::apply(&mut family, &new_config, &impact).unwrap();
        assert_eq!(rerun, MigrationResult::default());
        assert_eq!(family.periods, snapshot.0);
        assert_eq!(family.categories, snapshot.1);
        assert_eq!(
            family
                .transactions
                .iter()
                .map(|t| (t.id, t.category_id, t.date))
                .collect::<Vec<_>>(),
            snapshot.2
        );
    }

    #[test]
    fn adjustment_window_reuses_the_open_record() {
        let mut family = FamilyLedger::new(
            "Smith",
            PeriodConfiguration::bi_weekly(date(2024, 1, 1), "USD"),
        );
        let window = DateWindow::new(date(2024, 1, 15), date(2024, 1, 28));
        PeriodLedger::get_or_create(&mut family, window);
        let category_id = family.add_category(BudgetCategory::new(
            "Rent",
            CategoryKind::Expense,
            window.start,
            1200.0,
        ));
        let late = family.add_transaction(Transaction::new(
            category_id,
            date(2024, 1, 25),
            1200.0,
        ));

        let new_config = PeriodConfiguration::bi_weekly(date(2024, 1, 18), "USD");
        let impact =
            ConfigurationImpactAnalyzer::analyze(&family, &new_config, date(2024, 1, 20))
                .unwrap();
        assert_eq!(
            impact.adjustment_period,
            Some(DateWindow::new(date(2024, 1, 15), date(2024, 1, 17)))
        );
        let result = PeriodMigrator::apply(&mut family, &new_config, &impact).unwrap();

        // Open record shortened into the adjustment window, new record added.
        assert_eq!(family.periods.len(), 2);
        let adjusted = family.period_at(date(2024, 1, 15)).unwrap();
        assert_eq!(adjusted.end_date, date(2024, 1, 17));
        let current = family.period_at(date(2024, 1, 18)).unwrap();
        assert_eq!(current.end_date, date(2024, 1, 31));
        assert_eq!(result.periods_created, 1);

        // The transaction dated inside the new window follows the copy.
        let copy = family
            .categories_in(date(2024, 1, 18))
            .next()
            .expect("carried category");
        let txn = family.transactions.iter().find(|t| t.id == late).unwrap();
        assert_eq!(txn.category_id, copy.id);
    }

    #[test]
    fn adopting_an_earlier_window_supersedes_the_open_record() {
        let mut family = FamilyLedger::new(
            "Smith",
            PeriodConfiguration::bi_weekly(date(2024, 1, 1), "USD"),
        );
        PeriodLedger::get_or_create(
            &mut family,
            DateWindow::new(date(2024, 1, 15), date(2024, 1, 28)),
        );
        let rent = family.add_category(BudgetCategory::new(
            "Rent",
            CategoryKind::Expense,
            date(2024, 1, 15),
            1200.0,
        ));
        let payment =
            family.add_transaction(Transaction::new(rent, date(2024, 1, 16), 1200.0));

        let new_config = PeriodConfiguration::bi_weekly(date(2024, 1, 10), "USD");
        let impact =
            ConfigurationImpactAnalyzer::analyze(&family, &new_config, date(2024, 1, 20))
                .unwrap();
        let result = PeriodMigrator::apply(&mut family, &new_config, &impact).unwrap();

        assert_eq!(result.periods_created, 1);
        assert_eq!(family.periods.len(), 1);
        let record = family.period_at(date(2024, 1, 10)).unwrap();
        assert_eq!(record.end_date, date(2024, 1, 23));

        // The category moves with the superseded window instead of being
        // duplicated or left pointing at a start no record will ever have.
        assert_eq!(family.categories.len(), 1);
        let category = family.categories.first().unwrap();
        assert_eq!(category.period_start_date, date(2024, 1, 10));
        let record_starts: Vec<_> =
            family.periods.iter().map(|p| p.start_date).collect();
        assert!(family
            .categories
            .iter()
            .all(|c| record_starts.contains(&c.period_start_date)));
        // Its transaction is still attached.
        let txn = family
            .transactions
            .iter()
            .find(|t| t.id == payment)
            .unwrap();
        assert_eq!(txn.category_id, category.id);
    }

    #[test]
    fn rescoping_merges_into_an_existing_twin_category() {
        let mut family = FamilyLedger::new(
            "Smith",
            PeriodConfiguration::bi_weekly(date(2024, 1, 1), "USD"),
        );
        PeriodLedger::get_or_create(
            &mut family,
            DateWindow::new(date(2024, 1, 15), date(2024, 1, 28)),
        );
        let rent = family.add_category(BudgetCategory::new(
            "Rent",
            CategoryKind::Expense,
            date(2024, 1, 15),
            1200.0,
        ));
        let payment =
            family.add_transaction(Transaction::new(rent, date(2024, 1, 16), 1200.0));
        // A twin already scoped to the window being adopted.
        let twin = family.add_category(BudgetCategory::new(
            "Rent",
            CategoryKind::Expense,
            date(2024, 1, 10),
            1100.0,
        ));

        let new_config = PeriodConfiguration::bi_weekly(date(2024, 1, 10), "USD");
        let impact =
            ConfigurationImpactAnalyzer::analyze(&family, &new_config, date(2024, 1, 20))
                .unwrap();
        PeriodMigrator::apply(&mut family, &new_config, &impact).unwrap();

        assert_eq!(family.categories.len(), 1);
        assert_eq!(family.categories.first().unwrap().id, twin);
        let txn = family
            .transactions
            .iter()
            .find(|t| t.id == payment)
            .unwrap();
        assert_eq!(txn.category_id, twin);
    }
}
