use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cadence::Cadence;

/// Per-family period configuration. `anchor_day` applies to Monthly cadences;
/// `base_date` anchors the fixed-length tiling of BiWeekly and Weekly cadences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodConfiguration {
    pub cadence: Cadence,
    #[serde(default = "PeriodConfiguration::default_anchor_day")]
    pub anchor_day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_date: Option<NaiveDate>,
    pub currency: String,
}

impl PeriodConfiguration {
    pub fn monthly(anchor_day: u32, currency: impl Into<String>) -> Self {
        Self {
            cadence: Cadence::Monthly,
            anchor_day,
            base_date: None,
            currency: currency.into(),
        }
    }

    pub fn bi_weekly(base_date: NaiveDate, currency: impl Into<String>) -> Self {
        Self {
            cadence: Cadence::BiWeekly,
            anchor_day: Self::default_anchor_day(),
            base_date: Some(base_date),
            currency: currency.into(),
        }
    }

    pub fn weekly(base_date: NaiveDate, currency: impl Into<String>) -> Self {
        Self {
            cadence: Cadence::Weekly,
            anchor_day: Self::default_anchor_day(),
            base_date: Some(base_date),
            currency: currency.into(),
        }
    }

    pub fn default_anchor_day() -> u32 {
        1
    }
}

impl Default for PeriodConfiguration {
    fn default() -> Self {
        Self::monthly(1, "USD")
    }
}
