use serde::{Deserialize, Serialize};

use super::stage::{Boundary, Stage, StageColumn, StageStatus};
use super::time::Timestamp;

crate::define_key_type!(i64, OrderId);

/// Start/end timestamps of one stage; either may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpan {
    pub stage: Stage,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl StageSpan {
    pub fn empty(stage: Stage) -> Self {
        Self {
            stage,
            start: None,
            end: None,
        }
    }

    pub fn new(stage: Stage, start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { stage, start, end }
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// `Finished` once the end is recorded, `Started` with only a start,
    /// otherwise `Waiting`.
    pub fn status(&self) -> StageStatus {
        match (self.start, self.end) {
            (_, Some(_)) => StageStatus::Finished,
            (Some(_), None) => StageStatus::Started,
            (None, None) => StageStatus::Waiting,
        }
    }
}

/// One production order with the timestamps of every stage.
///
/// Spans are always kept in pipeline order, one per stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub order_id: OrderId,
    spans: Vec<StageSpan>,
}

impl StageRecord {
    /// A record with every stage waiting.
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            spans: Stage::ALL.iter().map(|s| StageSpan::empty(*s)).collect(),
        }
    }

    /// Builder-style setter for a stage's timestamps.
    pub fn with_stage(
        mut self,
        stage: Stage,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Self {
        self.set(stage.start_column(), start);
        self.set(stage.end_column(), end);
        self
    }

    pub fn spans(&self) -> &[StageSpan] {
        &self.spans
    }

    pub fn span(&self, stage: Stage) -> &StageSpan {
        &self.spans[Self::index(stage)]
    }

    pub fn get(&self, column: StageColumn) -> Option<Timestamp> {
        let span = self.span(column.stage);
        match column.boundary {
            Boundary::Start => span.start,
            Boundary::End => span.end,
        }
    }

    pub fn set(&mut self, column: StageColumn, value: Option<Timestamp>) {
        let span = &mut self.spans[Self::index(column.stage)];
        match column.boundary {
            Boundary::Start => span.start = value,
            Boundary::End => span.end = value,
        }
    }

    /// Every column value in pipeline order.
    pub fn columns(&self) -> impl Iterator<Item = (StageColumn, Option<Timestamp>)> + '_ {
        StageColumn::pipeline_order()
            .into_iter()
            .map(move |col| (col, self.get(col)))
    }

    pub fn missing_count(&self) -> usize {
        self.columns().filter(|(_, v)| v.is_none()).count()
    }

    pub fn stage_statuses(&self) -> Vec<(Stage, StageStatus)> {
        self.spans.iter().map(|s| (s.stage, s.status())).collect()
    }

    fn index(stage: Stage) -> usize {
        stage as usize
    }
}
