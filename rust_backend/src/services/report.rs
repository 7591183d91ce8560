use log::info;
use serde::Serialize;

use crate::algorithms::StageMeans;
use crate::config::ProductionConfig;
use crate::error::TimelineResult;
use crate::models::{StageRecord, Timestamp};

use super::forecast::{fill_records, FilledRecord};
use super::stage_statistics::{compute_stage_statistics, filter_by_cut_window, imputation_means, StageStatistics};

/// Statistics over the historical population plus forecasts for open orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionReport {
    pub generated_at: Timestamp,
    pub statistics: StageStatistics,
    /// Means actually used to fill the forecasts.
    pub imputation_means: StageMeans,
    pub forecasts: Vec<FilledRecord>,
}

/// Build a report from raw records.
///
/// Statistics use the configured history window when one is set, otherwise
/// every record. Only records with at least one missing column are forecast.
pub fn build_report(
    records: &[StageRecord],
    config: &ProductionConfig,
    now: Timestamp,
) -> TimelineResult<ProductionReport> {
    let calendar = config.build_calendar()?;
    let configured = config.stage_means()?;

    let history = match config.history_window()? {
        Some((from, to)) => {
            let kept = filter_by_cut_window(records, from, to);
            info!("History window {}..{} keeps {} of {} record(s)", from, to, kept.len(), records.len());
            kept
        }
        None => records.to_vec(),
    };

    let statistics = compute_stage_statistics(&history, calendar);
    let means = imputation_means(&statistics.means, &configured);

    let open: Vec<StageRecord> = records
        .iter()
        .filter(|r| r.missing_count() > 0)
        .cloned()
        .collect();
    let forecasts = fill_records(&open, calendar, &means, now);

    Ok(ProductionReport {
        generated_at: now,
        statistics,
        imputation_means: means,
        forecasts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimelineError;
    use crate::models::{OrderId, Stage};

    fn ts(d: u32, h: u32, m: u32) -> Timestamp {
        Timestamp::from_ymd_hm(2024, 3, d, h, m).unwrap()
    }

    fn complete(id: i64) -> StageRecord {
        Stage::ALL.iter().fold(StageRecord::new(OrderId::new(id)), |record, stage| {
            record.with_stage(*stage, Some(ts(4, 8, 0)), Some(ts(4, 9, 0)))
        })
    }

    #[test]
    fn test_report_forecasts_only_open_orders() {
        let records = vec![complete(1), StageRecord::new(OrderId::new(2))];
        let report = build_report(&records, &ProductionConfig::default(), ts(5, 8, 0)).unwrap();

        assert_eq!(report.statistics.population, 2);
        assert_eq!(report.forecasts.len(), 1);
        assert_eq!(report.forecasts[0].record.order_id.value(), 2);
        // 60 minutes over a population of 2.
        assert_eq!(report.imputation_means.minutes(Stage::Cut), Some(30.0));
    }

    #[test]
    fn test_report_applies_history_window() {
        let toml = r#"
[history]
from = "2024-03-01"
to = "2024-03-02"
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        let records = vec![complete(1)];
        let report = build_report(&records, &config, ts(5, 8, 0)).unwrap();

        assert_eq!(report.statistics.population, 0);
        assert_eq!(report.imputation_means, StageMeans::defaults());
        assert!(report.forecasts.is_empty());
    }

    #[test]
    fn test_report_rejects_bad_calendar() {
        let toml = r#"
[calendar]
workdays = []
"#;
        let config: ProductionConfig = toml.parse().unwrap();
        let result = build_report(&[], &config, ts(5, 8, 0));
        assert!(matches!(result, Err(TimelineError::ConfigurationError(_))));
    }
}
