//! Restricted-period parsing.
//!
//! A teacher carries standing unavailabilities denormalized as strings in the
//! storage format `"<DayAbbrev>-<Period>"`, e.g. `"Mon-3"`. The day
//! abbreviation matches case-insensitively and the period is a base-10
//! integer. Malformed entries are ignored, not errors: a typo in one entry
//! must never block scheduling on the others.

use serde::{Deserialize, Serialize};

use super::day::Day;

/// A standing (day, period) unavailability for one teacher.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestrictedPeriod {
    pub day: Day,
    pub period: u8,
}

impl RestrictedPeriod {
    /// Parse one `"Day-Period"` entry. Returns `None` for anything malformed.
    pub fn parse(raw: &str) -> Option<RestrictedPeriod> {
        let mut parts = raw.trim().splitn(2, '-');
        let day = Day::from_abbrev(parts.next()?)?;
        let period: u8 = parts.next()?.trim().parse().ok()?;
        Some(RestrictedPeriod { day, period })
    }

    /// Parse a list of raw entries, silently dropping malformed ones.
    pub fn parse_list<S: AsRef<str>>(raw: &[S]) -> Vec<RestrictedPeriod> {
        raw.iter()
            .filter_map(|entry| RestrictedPeriod::parse(entry.as_ref()))
            .collect()
    }

    pub fn matches(&self, day: Day, period: u8) -> bool {
        self.day == day && self.period == period
    }
}

impl std::fmt::Display for RestrictedPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.day.abbrev(), self.period)
    }
}
