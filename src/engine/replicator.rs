use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::domain::{Cadence, FamilyLedger, Transaction};

use super::{
    calculator::{shift_month, PeriodCalculator},
    carryover::carry_category,
    ledger::PeriodLedger,
    EngineError, EngineResult,
};

/// Counters describing one replication pass. A second pass over the same
/// window reports only `already_existed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicationResult {
    pub groups_created: usize,
    pub transactions_created: usize,
    /// Recurring (name, kind) groups already present in the target window.
    pub already_existed: usize,
}

/// Carries recurring categories and their fixed transactions into a window on
/// its first access. Idempotent: present groups are skipped, and with no
/// recurring source the pass is a no-op.
pub struct RecurringReplicator;

impl RecurringReplicator {
    pub fn ensure(
        family: &mut FamilyLedger,
        period_start: NaiveDate,
    ) -> EngineResult<ReplicationResult> {
        let target = match family.period_at(period_start) {
            Some(record) => record.window(),
            None => {
                let window =
                    PeriodCalculator::compute_boundaries(&family.configuration, period_start)?;
                if window.start != period_start {
                    return Err(EngineError::Invalid(format!(
                        "{period_start} is not a period start; the containing period begins {}",
                        window.start
                    )));
                }
                window
            }
        };
        PeriodLedger::get_or_create(family, target);

        let mut result = ReplicationResult::default();
        let cadence = family.configuration.cadence;
        for (source_id, source_start) in Self::latest_recurring_sources(family, period_start) {
            let Some(carried) = carry_category(family, source_id, period_start) else {
                continue;
            };
            if !carried.created {
                result.already_existed += 1;
                continue;
            }
            result.groups_created += 1;

            let fixed: Vec<Transaction> = family
                .transactions_for(source_id)
                .filter(|t| t.fixed)
                .cloned()
                .collect();
            for template in fixed {
                let mut copy = Transaction::new(
                    carried.target_id,
                    Self::date_adjust(template.date, source_start, period_start, cadence),
                    template.amount,
                );
                copy.note = template.note.clone();
                copy.fixed = true;
                family.add_transaction(copy);
                result.transactions_created += 1;
            }
        }

        if result.groups_created > 0 {
            tracing::info!(
                window = %period_start,
                groups = result.groups_created,
                transactions = result.transactions_created,
                "replicated recurring data into period"
            );
        }
        Ok(result)
    }

    /// Most recent instance of each distinct recurring (name, kind) pair
    /// across all windows strictly before `period_start`, in the stable order
    /// the categories were recorded.
    fn latest_recurring_sources(
        family: &FamilyLedger,
        period_start: NaiveDate,
    ) -> Vec<(Uuid, NaiveDate)> {
        let mut picks: Vec<usize> = Vec::new();
        for (index, candidate) in family.categories.iter().enumerate() {
            if !candidate.recurring || candidate.period_start_date >= period_start {
                continue;
            }
            match picks
                .iter()
                .position(|&i| family.categories[i].matches(&candidate.name, candidate.kind))
            {
                Some(slot) => {
                    if candidate.period_start_date
                        > family.categories[picks[slot]].period_start_date
                    {
                        picks[slot] = index;
                    }
                }
                None => picks.push(index),
            }
        }
        picks
            .into_iter()
            .map(|i| {
                let category = &family.categories[i];
                (category.id, category.period_start_date)
            })
            .collect()
    }

    /// Re-dates a copied transaction for the target window. Monthly shifts by
    /// the whole-month delta between the period starts and clamps to the
    /// target month; fixed-length cadences preserve the day offset from the
    /// period start.
    pub fn date_adjust(
        source_date: NaiveDate,
        source_start: NaiveDate,
        target_start: NaiveDate,
        cadence: Cadence,
    ) -> NaiveDate {
        match cadence {
            Cadence::Monthly => {
                let months = (target_start.year() - source_start.year()) * 12
                    + (target_start.month() as i32 - source_start.month() as i32);
                shift_month(source_date, months)
            }
            Cadence::BiWeekly | Cadence::Weekly => {
                target_start + (source_date - source_start)
            }
        }
    }
}
