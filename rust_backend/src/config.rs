//! Production configuration file support.
//!
//! Reads the work calendar, imputation constants and the history window used
//! for statistics from a `production.toml` file.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::algorithms::{parse_hours_minutes, StageMeans, WorkCalendar};
use crate::error::{TimelineError, TimelineResult};
use crate::models::Stage;

/// Configuration loaded from `production.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionConfig {
    #[serde(default)]
    pub calendar: CalendarSettings,
    /// `"HH:MM"` per stage name or column prefix; overrides the built-in constants.
    #[serde(default)]
    pub stage_means: BTreeMap<String, String>,
    #[serde(default)]
    pub history: HistorySettings,
}

/// Daily work window and workdays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSettings {
    #[serde(default = "default_work_start_hour")]
    pub work_start_hour: u32,
    #[serde(default = "default_work_start_minute")]
    pub work_start_minute: u32,
    #[serde(default = "default_work_end_hour")]
    pub work_end_hour: u32,
    #[serde(default = "default_work_end_minute")]
    pub work_end_minute: u32,
    #[serde(default = "default_workdays")]
    pub workdays: Vec<String>,
}

/// Cut-date window of the historical population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySettings {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

fn default_work_start_hour() -> u32 {
    7
}

fn default_work_start_minute() -> u32 {
    30
}

fn default_work_end_hour() -> u32 {
    16
}

fn default_work_end_minute() -> u32 {
    30
}

fn default_workdays() -> Vec<String> {
    ["Mon", "Tue", "Wed", "Thu", "Fri"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            work_start_hour: default_work_start_hour(),
            work_start_minute: default_work_start_minute(),
            work_end_hour: default_work_end_hour(),
            work_end_minute: default_work_end_minute(),
            workdays: default_workdays(),
        }
    }
}

impl std::str::FromStr for ProductionConfig {
    type Err = TimelineError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        toml::from_str(content).map_err(|e| {
            TimelineError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })
    }
}

impl ProductionConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TimelineResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            TimelineError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        content.parse()
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `production.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> TimelineResult<Self> {
        let search_paths = [
            PathBuf::from("production.toml"),
            PathBuf::from("rust_backend/production.toml"),
            PathBuf::from("../production.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(TimelineError::ConfigurationError(
            "No production.toml found in standard locations".to_string(),
        ))
    }

    /// Build and validate the work calendar.
    pub fn build_calendar(&self) -> TimelineResult<WorkCalendar> {
        let settings = &self.calendar;
        let workdays = settings
            .workdays
            .iter()
            .map(|day| {
                day.trim().parse::<Weekday>().map_err(|_| {
                    TimelineError::ConfigurationError(format!("Unknown workday: {}", day))
                })
            })
            .collect::<TimelineResult<Vec<_>>>()?;

        WorkCalendar::from_hours(
            settings.work_start_hour,
            settings.work_start_minute,
            settings.work_end_hour,
            settings.work_end_minute,
            workdays,
        )
    }

    /// Configured stage means laid over the built-in constants.
    pub fn stage_means(&self) -> TimelineResult<StageMeans> {
        let mut means = StageMeans::defaults();
        for (name, raw) in &self.stage_means {
            let stage = name.parse::<Stage>().map_err(|_| {
                TimelineError::ConfigurationError(format!("Unknown stage in [stage_means]: {}", name))
            })?;
            let minutes = parse_hours_minutes(raw).map_err(|e| {
                TimelineError::ConfigurationError(format!("Invalid mean for {}: {}", name, e))
            })?;
            means.insert(stage, minutes);
        }
        Ok(means)
    }

    /// History window, checked for `from <= to`.
    pub fn history_window(&self) -> TimelineResult<Option<(NaiveDate, NaiveDate)>> {
        match (self.history.from, self.history.to) {
            (Some(from), Some(to)) if from > to => Err(TimelineError::ConfigurationError(format!(
                "history.from ({}) is after history.to ({})",
                from, to
            ))),
            (Some(from), Some(to)) => Ok(Some((from, to))),
            (None, None) => Ok(None),
            _ => Err(TimelineError::ConfigurationError(
                "history requires both 'from' and 'to'".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ProductionConfig = "".parse().unwrap();
        let calendar = config.build_calendar().unwrap();
        assert_eq!(calendar, WorkCalendar::default());
        assert_eq!(config.stage_means().unwrap(), StageMeans::defaults());
        assert!(config.history_window().unwrap().is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[calendar]
work_start_hour = 8
work_start_minute = 0
work_end_hour = 17
work_end_minute = 0
workdays = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]

[stage_means]
cut = "03:15"
paineis = "06:00"

[history]
from = "2024-01-01"
to = "2024-03-31"
"#;

        let config: ProductionConfig = toml.parse().unwrap();
        let calendar = config.build_calendar().unwrap();
        assert_eq!(calendar.window_start(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(calendar.window_end(), NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert!(calendar.workdays().contains(&Weekday::Sat));

        let means = config.stage_means().unwrap();
        assert_eq!(means.minutes(Stage::Cut), Some(195.0));
        assert_eq!(means.minutes(Stage::Panel), Some(360.0));
        assert_eq!(means.minutes(Stage::Pack), Some(282.0));

        let (from, to) = config.history_window().unwrap().unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }

    #[test]
    fn test_unknown_workday_rejected() {
        let toml = r#"
[calendar]
workdays = ["Mon", "Funday"]
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        assert!(matches!(
            config.build_calendar(),
            Err(TimelineError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let toml = r#"
[calendar]
work_start_hour = 17
work_end_hour = 8
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        assert!(config.build_calendar().is_err());
    }

    #[test]
    fn test_empty_workdays_rejected() {
        let toml = r#"
[calendar]
workdays = []
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        assert!(config.build_calendar().is_err());
    }

    #[test]
    fn test_bad_stage_mean_rejected() {
        let toml = r#"
[stage_means]
cut = "4h30"
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        assert!(matches!(
            config.stage_means(),
            Err(TimelineError::ConfigurationError(_))
        ));

        let toml = r#"
[stage_means]
polishing = "01:00"
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        assert!(config.stage_means().is_err());
    }

    #[test]
    fn test_oversized_stage_mean_rejected() {
        for raw in ["99999999:00", "1e300"] {
            let toml = format!("[stage_means]\ncut = \"{}\"\n", raw);
            let config: ProductionConfig = toml.parse().unwrap();
            assert!(
                matches!(config.stage_means(), Err(TimelineError::ConfigurationError(_))),
                "accepted {}",
                raw
            );
        }
    }

    #[test]
    fn test_history_requires_both_bounds() {
        let toml = r#"
[history]
from = "2024-01-01"
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        assert!(config.history_window().is_err());

        let toml = r#"
[history]
from = "2024-04-01"
to = "2024-01-01"
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        assert!(config.history_window().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let result = "[calendar".parse::<ProductionConfig>();
        assert!(matches!(result, Err(TimelineError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stage_means]\nembalagem = \"01:30\"").unwrap();

        let config = ProductionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.stage_means().unwrap().minutes(Stage::Pack), Some(90.0));
    }

    #[test]
    fn test_from_missing_file() {
        let result = ProductionConfig::from_file("/nonexistent/production.toml");
        assert!(matches!(result, Err(TimelineError::ConfigurationError(_))));
    }
}
