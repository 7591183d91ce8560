use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Display format used by the production tables (`dd/mm/YYYY HH:MM:SS`).
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Naive formats accepted at ingestion, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    DISPLAY_FORMAT,
    "%d/%m/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Wall-clock timestamp with no timezone semantics.
///
/// All production timestamps are naive local values in a single implicit zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Build from calendar components, `None` when any component is out of range.
    pub fn from_ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .map(Self)
    }

    /// Parse a raw timestamp coming from the data source.
    ///
    /// Accepts the Brazilian display format, ISO 8601 with or without seconds,
    /// RFC 3339 with an offset (the offset is dropped and the wall clock kept),
    /// and bare dates (midnight).
    pub fn parse(raw: &str) -> TimelineResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimelineError::parse("empty timestamp"));
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(Self(dt));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.naive_local()));
        }
        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%#z") {
            return Ok(Self(dt.naive_local()));
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date.and_time(NaiveTime::MIN)));
        }

        Err(TimelineError::parse(format!(
            "unrecognized timestamp '{}'",
            trimmed
        )))
    }

    pub fn value(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Same date, clock set to `time`.
    pub fn with_time(&self, time: NaiveTime) -> Self {
        Self(self.0.date().and_time(time))
    }

    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Signed minutes from `self` to `later`, at second resolution.
    pub fn minutes_until(&self, later: Timestamp) -> f64 {
        (later.0 - self.0).num_seconds() as f64 / 60.0
    }

}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl std::str::FromStr for Timestamp {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(v: NaiveDateTime) -> Self {
        Timestamp::new(v)
    }
}
