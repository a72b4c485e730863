//! Weekday type used for schedule coordinates.
//!
//! All seven weekdays exist so that restricted-period strings can name any of
//! them; which days are actually scheduled is decided by the configured
//! school week (default Sunday through Thursday).

use serde::{Deserialize, Serialize};

/// Day of the week.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All weekdays in calendar order.
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Default five-day school week (Friday/Saturday closure).
    pub const DEFAULT_SCHOOL_WEEK: [Day; 5] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
    ];

    /// Three-letter abbreviation used in the restricted-period storage format.
    pub fn abbrev(&self) -> &'static str {
        match self {
            Day::Sunday => "Sun",
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
            Day::Saturday => "Sat",
        }
    }

    /// Parse a three-letter abbreviation, case-insensitively.
    pub fn from_abbrev(s: &str) -> Option<Day> {
        Day::ALL
            .into_iter()
            .find(|day| day.abbrev().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbrev_round_trips() {
        for day in Day::ALL {
            assert_eq!(Day::from_abbrev(day.abbrev()), Some(day));
        }
    }

    #[test]
    fn abbrev_parse_is_case_insensitive() {
        assert_eq!(Day::from_abbrev("mon"), Some(Day::Monday));
        assert_eq!(Day::from_abbrev("SUN"), Some(Day::Sunday));
        assert_eq!(Day::from_abbrev(" wed "), Some(Day::Wednesday));
    }

    #[test]
    fn abbrev_parse_rejects_unknown() {
        assert_eq!(Day::from_abbrev("Monday"), None);
        assert_eq!(Day::from_abbrev(""), None);
    }

    #[test]
    fn default_school_week_excludes_weekend_closure() {
        assert!(!Day::DEFAULT_SCHOOL_WEEK.contains(&Day::Friday));
        assert!(!Day::DEFAULT_SCHOOL_WEEK.contains(&Day::Saturday));
        assert_eq!(Day::DEFAULT_SCHOOL_WEEK.len(), 5);
    }
}
