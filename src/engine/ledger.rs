use chrono::NaiveDate;

use crate::domain::{
    Cadence, DateWindow, FamilyLedger, PeriodRecord, PeriodSummary, PeriodWindow,
};

use super::{calculator::PeriodCalculator, EngineResult};

/// Operations over the materialized period records of a family. A record that
/// already covers a date is canonical and beats recomputation.
pub struct PeriodLedger;

impl PeriodLedger {
    /// Window containing `reference`: the overlapping materialized record if
    /// one exists, otherwise the calculator's answer for the stored config.
    pub fn resolve(family: &FamilyLedger, reference: NaiveDate) -> EngineResult<DateWindow> {
        if let Some(record) = family.period_containing(reference) {
            return Ok(record.window());
        }
        PeriodCalculator::compute_boundaries(&family.configuration, reference)
    }

    /// Same as [`resolve`](Self::resolve), with a display label attached.
    pub fn resolve_window(
        family: &FamilyLedger,
        reference: NaiveDate,
    ) -> EngineResult<PeriodWindow> {
        let window = Self::resolve(family, reference)?;
        Ok(PeriodWindow {
            start: window.start,
            end: window.end,
            label: PeriodCalculator::label(&family.configuration, window),
        })
    }

    /// Idempotent get-or-create keyed on the window's start date. Returns
    /// whether a record was created.
    pub fn get_or_create(family: &mut FamilyLedger, window: DateWindow) -> bool {
        if family.period_at(window.start).is_some() {
            return false;
        }
        let cadence = family.configuration.cadence;
        let currency = family.configuration.currency.clone();
        family.add_period(PeriodRecord::new(window, cadence, currency));
        true
    }

    /// Summaries of every known window, most recent first. Includes the
    /// current window even when it has not been materialized yet.
    pub fn list_available(
        family: &FamilyLedger,
        today: NaiveDate,
    ) -> EngineResult<Vec<PeriodSummary>> {
        let current = Self::resolve(family, today)?;
        // Historical rows keep the cadence they were recorded under, so a
        // later configuration change does not relabel them.
        let mut windows: Vec<(DateWindow, Cadence)> = family
            .periods
            .iter()
            .map(|p| (p.window(), p.cadence))
            .collect();
        if !windows.iter().any(|(w, _)| w.start == current.start) {
            windows.push((current, family.configuration.cadence));
        }
        windows.sort_by(|a, b| b.0.start.cmp(&a.0.start));
        Ok(windows
            .into_iter()
            .map(|(window, cadence)| PeriodSummary {
                start: window.start,
                end: window.end,
                label: PeriodCalculator::label_for(cadence, window),
                is_current: window.contains(today),
                has_data: family.window_has_data(window),
            })
            .collect())
    }
}
