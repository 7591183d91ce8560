use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::algorithms::{summarize, DurationAggregator, StageMeans, StageSummary, WorkCalendar};
use crate::models::{Stage, StageRecord, Timestamp};

/// Per-stage statistics over a population of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStatistics {
    /// Distinct orders in the population.
    pub population: usize,
    /// Mean working minutes per stage.
    pub means: StageMeans,
    pub summary: Vec<StageSummary>,
}

/// Records whose cut stage started on or after `from` and ended on or before
/// `to`, both taken at midnight.
///
/// Records missing either cut timestamp are dropped.
pub fn filter_by_cut_window(records: &[StageRecord], from: NaiveDate, to: NaiveDate) -> Vec<StageRecord> {
    let from = Timestamp::new(from.and_time(chrono::NaiveTime::MIN));
    let to = Timestamp::new(to.and_time(chrono::NaiveTime::MIN));

    records
        .iter()
        .filter(|record| {
            let cut = record.span(Stage::Cut);
            matches!((cut.start, cut.end), (Some(start), Some(end)) if start >= from && end <= to)
        })
        .cloned()
        .collect()
}

pub fn compute_stage_statistics(records: &[StageRecord], calendar: WorkCalendar) -> StageStatistics {
    let aggregator = DurationAggregator::new(calendar);
    let means = aggregator.stage_means(records);
    let summary = summarize(&means);
    let population = records
        .iter()
        .map(|r| r.order_id)
        .collect::<std::collections::HashSet<_>>()
        .len();

    info!(
        "Computed stage statistics over {} order(s), {} record(s)",
        population,
        records.len()
    );

    StageStatistics {
        population,
        means,
        summary,
    }
}

/// Means used to impute missing timestamps.
///
/// A historical mean greater than zero overrides the configured value for
/// that stage; otherwise the configured value is kept.
pub fn imputation_means(historical: &StageMeans, configured: &StageMeans) -> StageMeans {
    let mut merged = configured.clone();
    for (stage, minutes) in historical.iter() {
        if minutes.is_finite() && minutes > 0.0 {
            merged.insert(stage, minutes);
        }
    }
    merged
}
