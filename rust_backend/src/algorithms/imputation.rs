//! Cursor-based imputation of missing stage timestamps.
//!
//! An [`ImputationSequencer`] walks one record's columns in order. Missing
//! stage-end columns are synthesized by advancing a running cursor by that
//! stage's mean duration in working minutes; every visited value, observed or
//! synthesized, pushes the cursor one minute past itself so later values are
//! strictly later.
//!
//! The sequencer owns its cursor and is not meant to be shared between fill
//! passes: call [`ImputationSequencer::reset`] before each record.

use log::debug;

use super::durations::StageMeans;
use super::work_calendar::WorkCalendar;
use crate::error::TimelineResult;
use crate::models::{StageColumn, Timestamp};

#[derive(Debug, Clone)]
pub struct ImputationSequencer {
    calendar: WorkCalendar,
    stage_means: StageMeans,
    cursor: Timestamp,
}

impl ImputationSequencer {
    pub fn new(calendar: WorkCalendar, stage_means: StageMeans, initial_cursor: Timestamp) -> Self {
        Self {
            calendar,
            stage_means,
            cursor: initial_cursor,
        }
    }

    /// Start a new record's timeline at `initial_cursor`.
    pub fn reset(&mut self, initial_cursor: Timestamp) {
        self.cursor = initial_cursor;
    }

    pub fn cursor(&self) -> Timestamp {
        self.cursor
    }

    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    pub fn stage_means(&self) -> &StageMeans {
        &self.stage_means
    }

    /// Value to use for a missing cell in `column_name`.
    ///
    /// Stage-end columns with a known mean advance the cursor by that many
    /// working minutes. Any other column (start columns, unknown names, stages
    /// without a mean) gets the cursor itself.
    pub fn fill_if_missing(&self, column_name: &str) -> Timestamp {
        match column_name.parse::<StageColumn>() {
            Ok(column) => self.fill_column(column),
            Err(_) => {
                debug!("No synthesis rule for column '{}', using cursor", column_name);
                self.cursor
            }
        }
    }

    /// Typed form of [`fill_if_missing`](Self::fill_if_missing).
    pub fn fill_column(&self, column: StageColumn) -> Timestamp {
        if !column.is_end() {
            return self.cursor;
        }
        match self.stage_means.whole_minutes(column.stage) {
            Some(minutes) => self.calendar.advance_working_minutes(self.cursor, minutes),
            None => {
                debug!("No mean duration for stage {}, using cursor", column.stage);
                self.cursor
            }
        }
    }

    /// Move the cursor one minute past `timestamp`.
    pub fn observe(&mut self, timestamp: Timestamp) {
        self.cursor = timestamp.plus_minutes(1);
    }

    /// Parse a raw cell value and observe it.
    pub fn observe_str(&mut self, raw: &str) -> TimelineResult<Timestamp> {
        let timestamp = Timestamp::parse(raw)?;
        self.observe(timestamp);
        Ok(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimelineError;
    use crate::models::Stage;

    // 2024-03-04 is a Monday.
    fn ts(d: u32, h: u32, m: u32) -> Timestamp {
        Timestamp::from_ymd_hm(2024, 3, d, h, m).unwrap()
    }

    fn sequencer(means: StageMeans, start: Timestamp) -> ImputationSequencer {
        ImputationSequencer::new(WorkCalendar::default(), means, start)
    }

    #[test]
    fn test_fill_end_column_advances_by_mean() {
        let seq = sequencer(StageMeans::new().with(Stage::Cut, 270.0), ts(4, 8, 0));
        assert_eq!(seq.fill_if_missing("cortefim"), ts(4, 12, 30));
        // Filling does not move the cursor by itself.
        assert_eq!(seq.cursor(), ts(4, 8, 0));
    }

    #[test]
    fn test_observe_moves_cursor_one_minute_past() {
        let mut seq = sequencer(StageMeans::new().with(Stage::Cut, 270.0), ts(4, 8, 0));
        let filled = seq.fill_if_missing("cortefim");
        seq.observe(filled);
        assert_eq!(seq.cursor(), ts(4, 12, 31));
    }

    #[test]
    fn test_column_names_are_case_insensitive() {
        let seq = sequencer(StageMeans::new().with(Stage::Cut, 270.0), ts(4, 8, 0));
        assert_eq!(seq.fill_if_missing("CORTEFIM"), ts(4, 12, 30));
    }

    #[test]
    fn test_start_columns_pass_through() {
        let seq = sequencer(StageMeans::defaults(), ts(9, 3, 0));
        // Passthrough does not normalize into the work window.
        assert_eq!(seq.fill_if_missing("corteinicio"), ts(9, 3, 0));
    }

    #[test]
    fn test_unknown_column_passes_through() {
        let seq = sequencer(StageMeans::defaults(), ts(4, 8, 0));
        assert_eq!(seq.fill_if_missing("dataentrega"), ts(4, 8, 0));
    }

    #[test]
    fn test_stage_without_mean_passes_through() {
        let seq = sequencer(StageMeans::new().with(Stage::Cut, 270.0), ts(4, 8, 0));
        assert_eq!(seq.fill_if_missing("paineisfim"), ts(4, 8, 0));
    }

    #[test]
    fn test_out_of_range_mean_passes_through() {
        let seq = sequencer(StageMeans::new().with(Stage::Cut, 1e300), ts(4, 8, 0));
        assert_eq!(seq.fill_if_missing("cortefim"), ts(4, 8, 0));
    }

    #[test]
    fn test_reset_replaces_cursor() {
        let mut seq = sequencer(StageMeans::defaults(), ts(4, 8, 0));
        seq.observe(ts(6, 15, 0));
        seq.reset(ts(11, 9, 0));
        assert_eq!(seq.cursor(), ts(11, 9, 0));
    }

    #[test]
    fn test_fill_rolls_over_weekend() {
        let seq = sequencer(StageMeans::new().with(Stage::Pack, 120.0), ts(8, 15, 30));
        assert_eq!(seq.fill_if_missing("embalagemfim"), ts(11, 8, 30));
    }

    #[test]
    fn test_observe_str() {
        let mut seq = sequencer(StageMeans::defaults(), ts(4, 8, 0));
        let observed = seq.observe_str("05/03/2024 10:00:00").unwrap();
        assert_eq!(observed, ts(5, 10, 0));
        assert_eq!(seq.cursor(), ts(5, 10, 1));
    }

    #[test]
    fn test_observe_str_rejects_malformed() {
        let mut seq = sequencer(StageMeans::defaults(), ts(4, 8, 0));
        let result = seq.observe_str("yesterday");
        assert!(matches!(result, Err(TimelineError::ParseError(_))));
        assert_eq!(seq.cursor(), ts(4, 8, 0));
    }

    #[test]
    fn test_sequence_is_strictly_increasing() {
        let mut seq = sequencer(StageMeans::defaults(), ts(8, 14, 0));
        let mut previous: Option<Timestamp> = None;
        for column in StageColumn::pipeline_order() {
            let value = seq.fill_column(column);
            if let Some(prev) = previous {
                assert!(value >= prev.plus_minutes(1), "{} not after {}", value, prev);
            }
            seq.observe(value);
            previous = Some(value);
        }
    }
}
