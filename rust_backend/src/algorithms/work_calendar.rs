//! Fixed weekly work calendar.
//!
//! A [`WorkCalendar`] knows which weekdays are worked and the daily window
//! (start and end clock time) inside which working minutes accumulate. It is
//! immutable and `Copy`, so every component that needs it keeps its own copy.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};
use crate::models::Timestamp;

/// Weekly work calendar: workdays plus a daily `[start, end]` window.
///
/// Deserialization goes through [`WorkCalendar::new`], so a decoded calendar
/// carries the same guarantees as a constructed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CalendarFields")]
pub struct WorkCalendar {
    window_start: NaiveTime,
    window_end: NaiveTime,
    /// Indexed by `Weekday::num_days_from_monday`.
    workdays: [bool; 7],
}

/// Wire shape of [`WorkCalendar`], validated on conversion.
#[derive(Deserialize)]
struct CalendarFields {
    window_start: NaiveTime,
    window_end: NaiveTime,
    workdays: [bool; 7],
}

impl TryFrom<CalendarFields> for WorkCalendar {
    type Error = TimelineError;

    fn try_from(fields: CalendarFields) -> Result<Self, Self::Error> {
        let workdays = WEEK
            .iter()
            .copied()
            .filter(|d| fields.workdays[d.num_days_from_monday() as usize]);
        Self::new(fields.window_start, fields.window_end, workdays)
    }
}

impl WorkCalendar {
    /// Build a calendar, rejecting an empty workday set or a window whose
    /// start is not strictly before its end.
    pub fn new<I>(window_start: NaiveTime, window_end: NaiveTime, workdays: I) -> TimelineResult<Self>
    where
        I: IntoIterator<Item = Weekday>,
    {
        if window_start >= window_end {
            return Err(TimelineError::config(format!(
                "work window start {} must be before end {}",
                window_start.format("%H:%M"),
                window_end.format("%H:%M")
            )));
        }

        let mut days = [false; 7];
        for day in workdays {
            days[day.num_days_from_monday() as usize] = true;
        }
        if !days.iter().any(|d| *d) {
            return Err(TimelineError::config("workday set must not be empty"));
        }

        Ok(Self {
            window_start,
            window_end,
            workdays: days,
        })
    }

    /// Build from hour/minute components.
    pub fn from_hours<I>(
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
        workdays: I,
    ) -> TimelineResult<Self>
    where
        I: IntoIterator<Item = Weekday>,
    {
        let start = NaiveTime::from_hms_opt(start_hour, start_minute, 0).ok_or_else(|| {
            TimelineError::config(format!(
                "invalid work start time {:02}:{:02}",
                start_hour, start_minute
            ))
        })?;
        let end = NaiveTime::from_hms_opt(end_hour, end_minute, 0).ok_or_else(|| {
            TimelineError::config(format!(
                "invalid work end time {:02}:{:02}",
                end_hour, end_minute
            ))
        })?;
        Self::new(start, end, workdays)
    }

    pub fn window_start(&self) -> NaiveTime {
        self.window_start
    }

    pub fn window_end(&self) -> NaiveTime {
        self.window_end
    }

    /// Length of one working day in minutes.
    pub fn window_minutes(&self) -> i64 {
        (self.window_end - self.window_start).num_minutes()
    }

    pub fn workdays(&self) -> Vec<Weekday> {
        WEEK.iter()
            .copied()
            .filter(|d| self.workdays[d.num_days_from_monday() as usize])
            .collect()
    }

    pub fn is_workday(&self, ts: Timestamp) -> bool {
        self.workdays[ts.weekday().num_days_from_monday() as usize]
    }

    /// Window start on the same date as `ts`.
    pub fn day_start(&self, ts: Timestamp) -> Timestamp {
        ts.with_time(self.window_start)
    }

    /// Window end on the same date as `ts`.
    pub fn day_end(&self, ts: Timestamp) -> Timestamp {
        ts.with_time(self.window_end)
    }

    /// Normalize `ts` into working time.
    ///
    /// Non-workdays jump to the next workday's window start. Before the window
    /// snaps to today's start. After the window jumps to the next workday only
    /// when `move_forward_if_past_end` is set; otherwise `ts` is kept as is.
    pub fn clamp_to_window(&self, ts: Timestamp, move_forward_if_past_end: bool) -> Timestamp {
        if !self.is_workday(ts) {
            return self.next_window_start(ts);
        }
        if ts.time() < self.window_start {
            return self.day_start(ts);
        }
        if ts.time() > self.window_end && move_forward_if_past_end {
            return self.next_window_start(ts);
        }
        ts
    }

    /// Window start on the first workday strictly after the date of `ts`.
    pub fn next_window_start(&self, ts: Timestamp) -> Timestamp {
        let mut next = ts.date() + Days::new(1);
        // Terminates within a week: construction guarantees one workday.
        while !self.workdays[day_index(next)] {
            next = next + Days::new(1);
        }
        Timestamp::new(next.and_time(self.window_start))
    }

    /// Advance `start` by `minutes` working minutes.
    ///
    /// Only time inside the daily window on workdays is consumed. A cursor that
    /// sits exactly on the window end with minutes left rolls over to the next
    /// workday. Zero (or negative) minutes return the normalized start.
    pub fn advance_working_minutes(&self, start: Timestamp, minutes: i64) -> Timestamp {
        let mut current = self.clamp_to_window(start, true);
        let mut remaining = minutes;

        while remaining > 0 {
            if !self.is_workday(current) {
                current = self.next_window_start(current);
                continue;
            }

            let window_start = self.day_start(current);
            if current < window_start {
                current = window_start;
            }

            let available = (self.day_end(current).value() - current.value())
                .num_minutes()
                .max(0);

            if remaining <= available {
                current = current.plus_minutes(remaining);
                remaining = 0;
            } else {
                remaining -= available;
                current = self.next_window_start(current);
            }
        }

        current
    }
}

impl Default for WorkCalendar {
    /// Monday to Friday, 07:30 to 16:30.
    fn default() -> Self {
        Self {
            window_start: NaiveTime::from_hms_opt(7, 30, 0).unwrap_or(NaiveTime::MIN),
            window_end: NaiveTime::from_hms_opt(16, 30, 0).unwrap_or(NaiveTime::MIN),
            workdays: [true, true, true, true, true, false, false],
        }
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn day_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}
