//! Production stages and the timestamp columns that describe them.
//!
//! Every order moves through seven stages in a fixed pipeline order. Each stage
//! has a start column (`<prefix>inicio`) and an end column (`<prefix>fim`) in the
//! production table; those names are the stable identifiers used by the data
//! source and by the imputation sequencer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TimelineError;

/// A production stage, ordered as the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Cut,
    Customize,
    EdgeBand,
    Machine,
    Panel,
    Assemble,
    Pack,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Cut,
        Stage::Customize,
        Stage::EdgeBand,
        Stage::Machine,
        Stage::Panel,
        Stage::Assemble,
        Stage::Pack,
    ];

    /// Column prefix used by the production table.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Stage::Cut => "corte",
            Stage::Customize => "customizacao",
            Stage::EdgeBand => "coladeira",
            Stage::Machine => "usinagem",
            Stage::Panel => "paineis",
            Stage::Assemble => "montagem",
            Stage::Pack => "embalagem",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Cut => "cut",
            Stage::Customize => "customize",
            Stage::EdgeBand => "edge_band",
            Stage::Machine => "machine",
            Stage::Panel => "panel",
            Stage::Assemble => "assemble",
            Stage::Pack => "pack",
        }
    }

    pub fn start_column(&self) -> StageColumn {
        StageColumn::new(*self, Boundary::Start)
    }

    pub fn end_column(&self) -> StageColumn {
        StageColumn::new(*self, Boundary::End)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = TimelineError;

    /// Accepts either the English name (`edge_band`) or the column prefix (`coladeira`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.name() == key || stage.column_prefix() == key)
            .ok_or_else(|| TimelineError::parse(format!("unknown stage '{}'", s.trim())))
    }
}

/// Which end of a stage a column records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Start,
    End,
}

impl Boundary {
    fn suffix(&self) -> &'static str {
        match self {
            Boundary::Start => "inicio",
            Boundary::End => "fim",
        }
    }
}

/// One timestamp column of the production table, e.g. `cortefim`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StageColumn {
    pub stage: Stage,
    pub boundary: Boundary,
}

impl StageColumn {
    pub fn new(stage: Stage, boundary: Boundary) -> Self {
        Self { stage, boundary }
    }

    /// Column name as it appears in the data source.
    pub fn name(&self) -> String {
        format!("{}{}", self.stage.column_prefix(), self.boundary.suffix())
    }

    pub fn is_end(&self) -> bool {
        self.boundary == Boundary::End
    }

    /// All fourteen columns, start before end, stages in pipeline order.
    pub fn pipeline_order() -> Vec<StageColumn> {
        Stage::ALL
            .iter()
            .flat_map(|stage| [stage.start_column(), stage.end_column()])
            .collect()
    }
}

impl fmt::Display for StageColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stage.column_prefix(), self.boundary.suffix())
    }
}

impl FromStr for StageColumn {
    type Err = TimelineError;

    /// Case-insensitive match on the data-source column name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        for stage in Stage::ALL {
            let Some(rest) = key.strip_prefix(stage.column_prefix()) else {
                continue;
            };
            match rest {
                "inicio" => return Ok(stage.start_column()),
                "fim" => return Ok(stage.end_column()),
                _ => {}
            }
        }
        Err(TimelineError::parse(format!(
            "unknown stage column '{}'",
            s.trim()
        )))
    }
}

/// Progress of a single stage, derived from which timestamps are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    Finished,
    Started,
    Waiting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(Stage::Cut.end_column().name(), "cortefim");
        assert_eq!(Stage::EdgeBand.start_column().name(), "coladeirainicio");
        assert_eq!(Stage::Pack.end_column().to_string(), "embalagemfim");
    }

    #[test]
    fn test_column_parse_is_case_insensitive() {
        let col: StageColumn = "CorteFim".parse().unwrap();
        assert_eq!(col, Stage::Cut.end_column());

        let col: StageColumn = " usinageminicio ".parse().unwrap();
        assert_eq!(col, Stage::Machine.start_column());
    }

    #[test]
    fn test_column_parse_rejects_unknown() {
        assert!("dataentrega".parse::<StageColumn>().is_err());
        assert!("corte".parse::<StageColumn>().is_err());
        assert!("cortefimx".parse::<StageColumn>().is_err());
    }

    #[test]
    fn test_pipeline_order() {
        let order = StageColumn::pipeline_order();
        assert_eq!(order.len(), 14);
        assert_eq!(order[0].name(), "corteinicio");
        assert_eq!(order[1].name(), "cortefim");
        assert_eq!(order[13].name(), "embalagemfim");
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_stage_parse_accepts_both_spellings() {
        assert_eq!("edge_band".parse::<Stage>().unwrap(), Stage::EdgeBand);
        assert_eq!("Edge-Band".parse::<Stage>().unwrap(), Stage::EdgeBand);
        assert_eq!("montagem".parse::<Stage>().unwrap(), Stage::Assemble);
        assert!("welding".parse::<Stage>().is_err());
    }
}
