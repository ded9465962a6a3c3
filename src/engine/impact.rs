use chrono::{Duration, NaiveDate};

use crate::domain::{Cadence, DateWindow, FamilyLedger, PeriodConfiguration};

use super::{calculator::PeriodCalculator, ledger::PeriodLedger, EngineResult};

/// Dry-run verdict for a proposed configuration change. Never applied
/// implicitly; callers confirm and hand it to the migrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Impact {
    /// The open window's record must be touched before the change is live.
    pub requires_close: bool,
    pub current_period: DateWindow,
    pub new_current_period: DateWindow,
    /// Synthesized short window absorbing the gap between the old current
    /// start and the new current start, when one is needed.
    pub adjustment_period: Option<DateWindow>,
    pub message: String,
}

/// Compares the stored configuration against a proposed one and decides how
/// the open window must be reconciled. Pure: reads family state, writes
/// nothing.
pub struct ConfigurationImpactAnalyzer;

impl ConfigurationImpactAnalyzer {
    pub fn analyze(
        family: &FamilyLedger,
        new_config: &PeriodConfiguration,
        today: NaiveDate,
    ) -> EngineResult<Impact> {
        PeriodCalculator::validate(&family.configuration)?;
        PeriodCalculator::validate(new_config)?;

        let old_config = &family.configuration;
        let current = PeriodLedger::resolve(family, today)?;
        let mut candidate = PeriodCalculator::compute_boundaries(new_config, today)?;

        let cadence_changed = new_config.cadence != old_config.cadence;
        let anchor_changed = old_config.cadence == Cadence::Monthly
            && new_config.cadence == Cadence::Monthly
            && new_config.anchor_day != old_config.anchor_day;

        // Re-anchor by probing the day after the open window rather than
        // "today" when the candidate would reopen a past window. Base-date
        // edits on fixed cadences are exempt: adopting an earlier start is
        // their documented adopt-directly path.
        if (cadence_changed || anchor_changed) && candidate.start < current.start {
            candidate = PeriodCalculator::compute_boundaries(
                new_config,
                current.end + Duration::days(1),
            )?;
        }

        if candidate == current {
            return Ok(Impact {
                requires_close: false,
                current_period: current,
                new_current_period: candidate,
                adjustment_period: None,
                message: "The new configuration leaves the current period unchanged.".into(),
            });
        }

        let impact = if !cadence_changed {
            match new_config.cadence {
                Cadence::Monthly => Self::monthly_anchor_shift(current, candidate),
                Cadence::BiWeekly | Cadence::Weekly => {
                    Self::base_date_shift(current, candidate)
                }
            }
        } else {
            Self::cadence_shift(old_config.cadence, new_config.cadence, current, candidate, today)
        };
        Ok(impact)
    }

    /// Same cadence, Monthly, anchor day moved: the open window shortens or
    /// lengthens in place; no adjustment window is needed.
    fn monthly_anchor_shift(current: DateWindow, candidate: DateWindow) -> Impact {
        Impact {
            requires_close: true,
            current_period: current,
            new_current_period: candidate,
            adjustment_period: None,
            message: format!(
                "Changing the anchor day closes the current period on {} and starts the next period on {}.",
                candidate.start - Duration::days(1),
                candidate.start
            ),
        }
    }

    /// Same fixed-length cadence, base date moved.
    fn base_date_shift(current: DateWindow, candidate: DateWindow) -> Impact {
        if candidate.start > current.start {
            Self::with_adjustment(
                current,
                candidate,
                format!(
                    "Moving the base date opens a short adjustment period from {} to {} before the new schedule begins.",
                    current.start,
                    candidate.start - Duration::days(1)
                ),
            )
        } else {
            Impact {
                requires_close: true,
                current_period: current,
                new_current_period: candidate,
                adjustment_period: None,
                message: format!(
                    "Moving the base date realigns the current period to {} through {}.",
                    candidate.start, candidate.end
                ),
            }
        }
    }

    /// Cadence switch, ordered Weekly < BiWeekly < Monthly.
    fn cadence_shift(
        old: Cadence,
        new: Cadence,
        current: DateWindow,
        candidate: DateWindow,
        today: NaiveDate,
    ) -> Impact {
        let growing = new > old;
        let needs_adjustment = if growing {
            candidate.start > current.start
        } else {
            candidate.start > current.start && candidate.start < today
        };
        if needs_adjustment {
            Self::with_adjustment(
                current,
                candidate,
                format!(
                    "Switching from {} to {} closes the {} schedule early with an adjustment period from {} to {}.",
                    old,
                    new,
                    old,
                    current.start,
                    candidate.start - Duration::days(1)
                ),
            )
        } else {
            Impact {
                requires_close: true,
                current_period: current,
                new_current_period: candidate,
                adjustment_period: None,
                message: format!(
                    "Switching from {} to {} replaces the current period with {} through {}.",
                    old, new, candidate.start, candidate.end
                ),
            }
        }
    }

    fn with_adjustment(current: DateWindow, candidate: DateWindow, message: String) -> Impact {
        Impact {
            requires_close: true,
            current_period: current,
            new_current_period: candidate,
            adjustment_period: Some(DateWindow::new(
                current.start,
                candidate.start - Duration::days(1),
            )),
            message,
        }
    }
}
