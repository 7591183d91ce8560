//! Work-calendar algorithms.
//!
//! # Components
//!
//! - [`work_calendar`]: weekly work window and working-minute arithmetic
//! - [`imputation`]: cursor-based synthesis of missing stage timestamps
//! - [`durations`]: working durations, per-stage means and breakdowns
//!
//! # Example
//!
//! ```
//! use shopfloor_rust::algorithms::WorkCalendar;
//! use shopfloor_rust::models::Timestamp;
//!
//! let calendar = WorkCalendar::default();
//! let friday = Timestamp::parse("08/03/2024 15:30:00").unwrap();
//! let due = calendar.advance_working_minutes(friday, 120);
//! assert_eq!(due.to_string(), "11/03/2024 08:30:00");
//! ```

pub mod durations;
pub mod imputation;
pub mod work_calendar;

pub use durations::{
    mean_minutes, parse_hours_minutes, MAX_STAGE_MINUTES, summarize, to_hours_minutes, DurationAggregator,
    StageMeans, StageSummary,
};
pub use imputation::ImputationSequencer;
pub use work_calendar::WorkCalendar;
