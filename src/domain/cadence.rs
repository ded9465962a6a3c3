use std::fmt;

use serde::{Deserialize, Serialize};

/// Period cadence. Variants are declared shortest to longest so the derived
/// ordering matches the Weekly < BiWeekly < Monthly span ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cadence {
    Weekly,
    BiWeekly,
    Monthly,
}

impl Cadence {
    /// Window length in days for fixed-length cadences. Monthly windows vary
    /// with the calendar and have no fixed length.
    pub fn fixed_length_days(&self) -> Option<i64> {
        match self {
            Cadence::Weekly => Some(7),
            Cadence::BiWeekly => Some(14),
            Cadence::Monthly => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Cadence::Weekly => "Weekly",
            Cadence::BiWeekly => "Bi-weekly",
            Cadence::Monthly => "Monthly",
        }
    }

    /// Canonical serialized tag for this cadence.
    pub fn tag(&self) -> &'static str {
        match self {
            Cadence::Weekly => "Weekly",
            Cadence::BiWeekly => "BiWeekly",
            Cadence::Monthly => "Monthly",
        }
    }

    /// Resolves a stored tag, tolerating legacy spellings. Returns `None` for
    /// values that match no known cadence.
    pub fn from_tag(tag: &str) -> Option<Cadence> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "weekly" => Some(Cadence::Weekly),
            "biweekly" | "bi-weekly" | "bi_weekly" => Some(Cadence::BiWeekly),
            "monthly" => Some(Cadence::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_ordering_ranks_weekly_lowest() {
        assert!(Cadence::Weekly < Cadence::BiWeekly);
        assert!(Cadence::BiWeekly < Cadence::Monthly);
    }

    #[test]
    fn tag_resolution_tolerates_legacy_spellings() {
        assert_eq!(Cadence::from_tag("bi-weekly"), Some(Cadence::BiWeekly));
        assert_eq!(Cadence::from_tag(" MONTHLY "), Some(Cadence::Monthly));
        assert_eq!(Cadence::from_tag("fortnightly"), None);
    }
}
