use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Cadence, DateWindow, PeriodConfiguration};

use super::{EngineError, EngineResult};

/// Pure boundary computation. Parameterized by an arbitrary configuration so
/// proposed, not-yet-saved changes can be simulated.
pub struct PeriodCalculator;

impl PeriodCalculator {
    /// Fails fast on configurations the engine must never compute against.
    pub fn validate(config: &PeriodConfiguration) -> EngineResult<()> {
        match config.cadence {
            Cadence::Monthly => {
                if !(1..=31).contains(&config.anchor_day) {
                    return Err(EngineError::AnchorOutOfRange(config.anchor_day));
                }
            }
            Cadence::BiWeekly | Cadence::Weekly => {
                if config.base_date.is_none() {
                    return Err(EngineError::MissingBaseDate(config.cadence));
                }
            }
        }
        Ok(())
    }

    /// Boundaries of the window containing `reference` under `config`.
    pub fn compute_boundaries(
        config: &PeriodConfiguration,
        reference: NaiveDate,
    ) -> EngineResult<DateWindow> {
        Self::validate(config)?;
        let window = match config.cadence {
            Cadence::Monthly => monthly_window(config.anchor_day, reference),
            Cadence::BiWeekly | Cadence::Weekly => {
                let length = config
                    .cadence
                    .fixed_length_days()
                    .expect("fixed-length cadence");
                // validate() guarantees the base date is present
                let base = config.base_date.expect("base date");
                tiled_window(base, reference, length)
            }
        };
        Ok(window)
    }

    /// Display label for a resolved window.
    pub fn label(config: &PeriodConfiguration, window: DateWindow) -> String {
        Self::label_for(config.cadence, window)
    }

    /// Label from the cadence a window was actually recorded under, so
    /// historical windows keep their own wording after a configuration
    /// change.
    pub fn label_for(cadence: Cadence, window: DateWindow) -> String {
        match cadence {
            Cadence::Monthly if window.start.day() == 1 => {
                window.start.format("%B %Y").to_string()
            }
            _ => format!(
                "{} - {}",
                window.start.format("%b %d"),
                window.end.format("%b %d, %Y")
            ),
        }
    }
}

/// Monthly window around `reference`: a window starts on the anchor day of
/// each month, clamped to the month's last valid day.
fn monthly_window(anchor_day: u32, reference: NaiveDate) -> DateWindow {
    let anchor_here = clamped_anchor(reference.year(), reference.month(), anchor_day);
    let start = if reference >= anchor_here {
        anchor_here
    } else {
        let (year, month) = previous_month(reference.year(), reference.month());
        clamped_anchor(year, month, anchor_day)
    };
    let (next_year, next_month) = next_month(start.year(), start.month());
    let end = clamped_anchor(next_year, next_month, anchor_day) - Duration::days(1);
    DateWindow::new(start, end)
}

/// Fixed-length tiling from `base`. Negative indices are valid, so references
/// earlier than the base date still resolve to a window.
fn tiled_window(base: NaiveDate, reference: NaiveDate, length: i64) -> DateWindow {
    let index = (reference - base).num_days().div_euclid(length);
    let start = base + Duration::days(index * length);
    DateWindow::new(start, start + Duration::days(length - 1))
}

fn clamped_anchor(year: i32, month: u32, anchor_day: u32) -> NaiveDate {
    let day = anchor_day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day is valid")
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).expect("day 28 exists"));
    (first_next - Duration::days(1)).day()
}

/// Shifts a date by whole months, clamping the day to the target month.
pub(crate) fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).expect("clamped day is valid")
}
