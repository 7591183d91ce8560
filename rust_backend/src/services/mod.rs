//! Service layer on top of the calendar algorithms.
//!
//! Services combine records, the work calendar and stage means into the
//! outputs a caller actually wants: filled forecasts, stage statistics and
//! the combined production report.

pub mod forecast;
pub mod report;
pub mod stage_statistics;

pub use forecast::{fill_record, fill_record_with_order, fill_records, CellOrigin, FilledCell, FilledRecord};
pub use report::{build_report, ProductionReport};
pub use stage_statistics::{
    compute_stage_statistics, filter_by_cut_window, imputation_means, StageStatistics,
};
