//! Working-time durations and per-stage mean statistics.
//!
//! Durations are measured in working minutes: only time inside the daily work
//! window on workdays counts. Means are taken over the whole order population,
//! so stages with many incomplete pairs are diluted toward zero rather than
//! averaged over completed pairs only.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::work_calendar::WorkCalendar;
use crate::error::{TimelineError, TimelineResult};
use crate::models::{Stage, StageRecord, Timestamp};

/// Largest stage duration, in working minutes, accepted as an imputation step.
pub const MAX_STAGE_MINUTES: f64 = 1_000_000.0;

/// Per-stage mean duration in minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageMeans(BTreeMap<Stage, f64>);

impl StageMeans {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Historical constants used when no population is available.
    pub fn defaults() -> Self {
        [
            (Stage::Cut, 4, 30),
            (Stage::Customize, 5, 26),
            (Stage::EdgeBand, 4, 9),
            (Stage::Machine, 8, 52),
            (Stage::Panel, 7, 51),
            (Stage::Assemble, 12, 29),
            (Stage::Pack, 4, 42),
        ]
        .into_iter()
        .map(|(stage, h, m)| (stage, (h * 60 + m) as f64))
        .collect()
    }

    pub fn insert(&mut self, stage: Stage, minutes: f64) {
        self.0.insert(stage, minutes);
    }

    pub fn with(mut self, stage: Stage, minutes: f64) -> Self {
        self.insert(stage, minutes);
        self
    }

    pub fn minutes(&self, stage: Stage) -> Option<f64> {
        self.0.get(&stage).copied()
    }

    /// Mean rounded to whole minutes, for use as an imputation step.
    ///
    /// Non-finite, negative or out-of-range means (above
    /// [`MAX_STAGE_MINUTES`]) count as "no known duration".
    pub fn whole_minutes(&self, stage: Stage) -> Option<i64> {
        self.minutes(stage)
            .filter(|m| m.is_finite() && (0.0..=MAX_STAGE_MINUTES).contains(m))
            .map(|m| m.round() as i64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, f64)> + '_ {
        self.0.iter().map(|(s, m)| (*s, *m))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Stage, f64)> for StageMeans {
    fn from_iter<T: IntoIterator<Item = (Stage, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One row of the per-stage breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub decimal_hours: f64,
    pub percent_of_total: f64,
    pub formatted: Option<String>,
}

/// Computes working durations against a fixed calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationAggregator {
    calendar: WorkCalendar,
}

impl DurationAggregator {
    pub fn new(calendar: WorkCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    /// Working minutes between `start` and `end`.
    ///
    /// Zero when either endpoint is absent or on a non-workday, or when the
    /// adjusted start is not before the adjusted end. Endpoints outside the
    /// window are clamped to that day's window start/end, so a start after
    /// hours contributes nothing for its own day.
    pub fn working_duration(&self, start: Option<Timestamp>, end: Option<Timestamp>) -> f64 {
        let (Some(start), Some(end)) = (start, end) else {
            return 0.0;
        };
        let (Some(start), Some(end)) = (self.adjust(start), self.adjust(end)) else {
            return 0.0;
        };
        if start >= end {
            return 0.0;
        }

        let mut total = 0.0;
        let mut cursor = start;
        while cursor.date() <= end.date() {
            if self.calendar.is_workday(cursor) {
                let from = cursor.max(self.calendar.day_start(cursor));
                let to = end.min(self.calendar.day_end(cursor));
                if to > from {
                    total += from.minutes_until(to);
                }
            }
            cursor = self.calendar.next_window_start(cursor);
        }
        total
    }

    /// Working minutes of every stage of one record, in pipeline order.
    pub fn stage_durations(&self, record: &StageRecord) -> Vec<(Stage, f64)> {
        record
            .spans()
            .iter()
            .map(|span| (span.stage, self.working_duration(span.start, span.end)))
            .collect()
    }

    /// Mean working minutes per stage over `records`.
    ///
    /// The population is the number of distinct order ids; incomplete stages
    /// contribute zero to the sum but still count in the population.
    pub fn stage_means(&self, records: &[StageRecord]) -> StageMeans {
        let population = records
            .iter()
            .map(|r| r.order_id)
            .collect::<HashSet<_>>()
            .len();

        let mut per_stage: BTreeMap<Stage, Vec<f64>> = BTreeMap::new();
        for record in records {
            for (stage, minutes) in self.stage_durations(record) {
                per_stage.entry(stage).or_default().push(minutes);
            }
        }

        Stage::ALL
            .iter()
            .map(|stage| {
                let durations = per_stage.get(stage).map(Vec::as_slice).unwrap_or(&[]);
                (*stage, mean_minutes(durations, population))
            })
            .collect()
    }

    fn adjust(&self, ts: Timestamp) -> Option<Timestamp> {
        if !self.calendar.is_workday(ts) {
            return None;
        }
        if ts.time() < self.calendar.window_start() {
            return Some(self.calendar.day_start(ts));
        }
        if ts.time() > self.calendar.window_end() {
            return Some(self.calendar.day_end(ts));
        }
        Some(ts)
    }
}

/// `sum(durations) / population`, or `0.0` for an empty population.
pub fn mean_minutes(durations: &[f64], population: usize) -> f64 {
    if population == 0 {
        return 0.0;
    }
    durations.iter().sum::<f64>() / population as f64
}

/// Format decimal hours as `HH:MM`.
///
/// Whole hours are truncated and the remaining fraction is floored to whole
/// minutes. Absent or NaN input stays absent.
pub fn to_hours_minutes(decimal_hours: Option<f64>) -> Option<String> {
    let value = decimal_hours.filter(|v| !v.is_nan())?;
    let hours = value.trunc();
    let minutes = ((value - hours) * 60.0).floor();
    Some(format!("{:02}:{:02}", hours as i64, minutes as i64))
}

/// Parse `HH:MM` (or a bare number of minutes) into minutes.
///
/// Durations above [`MAX_STAGE_MINUTES`] are rejected.
pub fn parse_hours_minutes(raw: &str) -> TimelineResult<f64> {
    let trimmed = raw.trim();
    let invalid = || TimelineError::parse(format!("invalid duration '{}', expected HH:MM", trimmed));

    let minutes = match trimmed.split_once(':') {
        Some((h, m)) => {
            let hours: u32 = h.trim().parse().map_err(|_| invalid())?;
            let minutes: u32 = m.trim().parse().map_err(|_| invalid())?;
            if minutes >= 60 {
                return Err(invalid());
            }
            hours
                .checked_mul(60)
                .and_then(|h| h.checked_add(minutes))
                .ok_or_else(invalid)? as f64
        }
        None => trimmed.parse::<f64>().map_err(|_| invalid())?,
    };

    if !minutes.is_finite() || !(0.0..=MAX_STAGE_MINUTES).contains(&minutes) {
        return Err(invalid());
    }
    Ok(minutes)
}

/// Per-stage breakdown with percentage of the total, in pipeline order.
///
/// Percentages are rounded to one decimal place. When the total is zero every
/// percentage is zero.
pub fn summarize(means: &StageMeans) -> Vec<StageSummary> {
    let total_hours: f64 = means.iter().map(|(_, m)| m / 60.0).sum();

    means
        .iter()
        .map(|(stage, minutes)| {
            let decimal_hours = minutes / 60.0;
            let percent_of_total = if total_hours > 0.0 {
                round_one_decimal(100.0 * decimal_hours / total_hours)
            } else {
                0.0
            };
            StageSummary {
                stage,
                decimal_hours,
                percent_of_total,
                formatted: to_hours_minutes(Some(decimal_hours)),
            }
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
