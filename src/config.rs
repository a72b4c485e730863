//! Engine configuration.
//!
//! School-specific knobs that are fixed for a deployment rather than per
//! request: which weekdays are taught and how many periods a day has. Loaded
//! from a TOML file or environment variables, with validated defaults.
//!
//! Environment variables:
//! - `TIMETABLE_CONFIG`: path to a TOML config file
//! - `SCHOOL_DAYS`: comma-separated day abbreviations, e.g. `Sun,Mon,Tue,Wed,Thu`
//! - `MAX_PERIODS_PER_DAY`: integer in `[1, 8]`

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Day;

/// Hard upper bound on periods per day; requests beyond it are invalid input.
pub const PERIOD_LIMIT: u8 = 8;

/// Deployment-level engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weekly teaching days, in scheduling order.
    pub school_days: Vec<Day>,
    /// Default periods per day when a request does not specify one.
    pub max_periods_per_day: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            school_days: Day::DEFAULT_SCHOOL_WEEK.to_vec(),
            max_periods_per_day: PERIOD_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document into a validated config.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(raw).context("Invalid engine config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Build a config from the environment. `TIMETABLE_CONFIG` (a file path)
    /// is read first when present; individual variables override it.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("TIMETABLE_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path))?;
                EngineConfig::from_toml_str(&raw)?
            }
            Err(_) => EngineConfig::default(),
        };

        if let Ok(days) = std::env::var("SCHOOL_DAYS") {
            config.school_days = parse_school_days(&days)?;
        }
        if let Ok(raw) = std::env::var("MAX_PERIODS_PER_DAY") {
            config.max_periods_per_day = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid MAX_PERIODS_PER_DAY: {}", raw))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.school_days.is_empty() {
            bail!("school_days must name at least one day");
        }
        let mut seen = self.school_days.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.school_days.len() {
            bail!("school_days must not repeat a day");
        }
        if self.max_periods_per_day == 0 || self.max_periods_per_day > PERIOD_LIMIT {
            bail!(
                "max_periods_per_day must be in [1, {}], got {}",
                PERIOD_LIMIT,
                self.max_periods_per_day
            );
        }
        Ok(())
    }
}

fn parse_school_days(raw: &str) -> Result<Vec<Day>> {
    raw.split(',')
        .map(|part| {
            Day::from_abbrev(part)
                .with_context(|| format!("Unknown day abbreviation in SCHOOL_DAYS: {:?}", part))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.school_days, Day::DEFAULT_SCHOOL_WEEK.to_vec());
        assert_eq!(config.max_periods_per_day, 8);
    }

    #[test]
    fn parses_toml_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            school_days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
            max_periods_per_day = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.school_days[0], Day::Monday);
        assert_eq!(config.max_periods_per_day, 6);
    }

    #[test]
    fn rejects_out_of_range_periods() {
        assert!(EngineConfig::from_toml_str("max_periods_per_day = 9").is_err());
        assert!(EngineConfig::from_toml_str("max_periods_per_day = 0").is_err());
    }

    #[test]
    fn rejects_duplicate_school_days() {
        let result = EngineConfig::from_toml_str(r#"school_days = ["Monday", "Monday"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn parses_school_days_env_format() {
        let days = parse_school_days("Sun,Mon,tue").unwrap();
        assert_eq!(days, vec![Day::Sunday, Day::Monday, Day::Tuesday]);
        assert!(parse_school_days("Sun,Nope").is_err());
    }
}
