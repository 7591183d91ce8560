use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::algorithms::{ImputationSequencer, StageMeans, WorkCalendar};
use crate::models::{StageColumn, StageRecord, Timestamp};

/// Where a filled cell's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellOrigin {
    /// Present in the source data.
    Observed,
    /// Synthesized and still in the future relative to "now".
    Projected,
    /// Synthesized but already in the past: the stage is late.
    Overdue,
}

impl CellOrigin {
    pub fn is_imputed(&self) -> bool {
        !matches!(self, CellOrigin::Observed)
    }
}

/// One cell of a filled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledCell {
    pub column: StageColumn,
    pub value: Timestamp,
    pub origin: CellOrigin,
}

/// A record whose visited columns all carry a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledRecord {
    pub record: StageRecord,
    pub cells: Vec<FilledCell>,
}

impl FilledRecord {
    pub fn imputed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.origin.is_imputed()).count()
    }

    pub fn overdue_cells(&self) -> impl Iterator<Item = &FilledCell> {
        self.cells
            .iter()
            .filter(|c| c.origin == CellOrigin::Overdue)
    }

    pub fn cell(&self, column: StageColumn) -> Option<&FilledCell> {
        self.cells.iter().find(|c| c.column == column)
    }
}

/// Fill one record's columns in pipeline order.
///
/// The sequencer is reset to `seed` first. Synthesized values earlier than
/// `now` are marked [`CellOrigin::Overdue`]. Dashboards that lay out assembly
/// before panels should pass their own column order to
/// [`fill_record_with_order`].
pub fn fill_record(
    sequencer: &mut ImputationSequencer,
    record: &StageRecord,
    seed: Timestamp,
    now: Timestamp,
) -> FilledRecord {
    fill_record_with_order(sequencer, record, &StageColumn::pipeline_order(), seed, now)
}

/// Fill one record visiting `order` left to right.
///
/// Columns not listed in `order` are left untouched.
pub fn fill_record_with_order(
    sequencer: &mut ImputationSequencer,
    record: &StageRecord,
    order: &[StageColumn],
    seed: Timestamp,
    now: Timestamp,
) -> FilledRecord {
    sequencer.reset(seed);

    let mut filled = record.clone();
    let mut cells = Vec::with_capacity(order.len());

    for column in order {
        let (value, origin) = match record.get(*column) {
            Some(observed) => (observed, CellOrigin::Observed),
            None => {
                let synthesized = sequencer.fill_column(*column);
                let origin = if synthesized < now {
                    CellOrigin::Overdue
                } else {
                    CellOrigin::Projected
                };
                filled.set(*column, Some(synthesized));
                (synthesized, origin)
            }
        };
        sequencer.observe(value);
        cells.push(FilledCell {
            column: *column,
            value,
            origin,
        });
    }

    let result = FilledRecord {
        record: filled,
        cells,
    };
    debug!(
        "Order {}: {} cell(s) imputed",
        result.record.order_id,
        result.imputed_count()
    );
    result
}

/// Fill every record on its own timeline seeded at `now`.
pub fn fill_records(
    records: &[StageRecord],
    calendar: WorkCalendar,
    means: &StageMeans,
    now: Timestamp,
) -> Vec<FilledRecord> {
    let mut sequencer = ImputationSequencer::new(calendar, means.clone(), now);
    let filled: Vec<FilledRecord> = records
        .iter()
        .map(|record| fill_record(&mut sequencer, record, now, now))
        .collect();

    info!(
        "Filled {} record(s), {} cell(s) imputed",
        filled.len(),
        filled.iter().map(FilledRecord::imputed_count).sum::<usize>()
    );
    filled
}
