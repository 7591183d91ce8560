use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{TimelineError, TimelineResult};
use crate::models::{OrderId, StageColumn, StageRecord, Timestamp};

/// Candidate keys that may contain the list of rows in the JSON payload
const ROW_KEYS: &[&str] = &["rows", "records", "data"];

/// Candidate keys for the order identifier inside each row
const ORDER_ID_KEYS: &[&str] = &["ordemdecompra", "order_id", "orderId"];

/// Key used by SQL RPC endpoints to wrap each returned row
const ROW_WRAPPER_KEY: &str = "exec_sql";

/// Parse stage records from a JSON file
pub fn parse_records_file(path: &Path) -> Result<Vec<StageRecord>> {
    let json_content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;

    parse_records_json_str(&json_content)
        .with_context(|| format!("Failed to parse records file: {}", path.display()))
}

/// Parse stage records from a JSON string
pub fn parse_records_json_str(json_str: &str) -> TimelineResult<Vec<StageRecord>> {
    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| TimelineError::parse(format!("invalid records JSON: {}", e)))?;

    let rows = find_rows_array(&value)
        .ok_or_else(|| TimelineError::parse("could not find a rows array in JSON"))?;

    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| parse_row(index, row))
        .collect::<TimelineResult<Vec<_>>>()?;

    debug!("Parsed {} stage record(s)", records.len());
    Ok(records)
}

/// Find the array of rows in the JSON payload
fn find_rows_array(payload: &Value) -> Option<&Vec<Value>> {
    if let Some(arr) = payload.as_array() {
        return Some(arr);
    }

    let obj = payload.as_object()?;
    ROW_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
}

/// Parse a single row, unwrapping the RPC wrapper when present
fn parse_row(index: usize, row: &Value) -> TimelineResult<StageRecord> {
    let obj = unwrap_row(row).ok_or_else(|| {
        TimelineError::parse(format!("row {} is not a JSON object", index))
    })?;

    let order_id = find_order_id(obj)?.ok_or_else(|| {
        TimelineError::ValidationError(format!("row {} has no order id", index))
    })?;

    let mut record = StageRecord::new(order_id);
    for (key, value) in obj {
        let Ok(column) = key.parse::<StageColumn>() else {
            continue;
        };
        let timestamp = parse_cell(value).map_err(|e| {
            TimelineError::parse(format!("order {}, column {}: {}", order_id, column, e))
        })?;
        record.set(column, timestamp);
    }

    Ok(record)
}

fn unwrap_row(row: &Value) -> Option<&Map<String, Value>> {
    let obj = row.as_object()?;
    match obj.get(ROW_WRAPPER_KEY) {
        Some(inner) if obj.len() == 1 => inner.as_object(),
        _ => Some(obj),
    }
}

fn find_order_id(obj: &Map<String, Value>) -> TimelineResult<Option<OrderId>> {
    let Some(value) = ORDER_ID_KEYS.iter().find_map(|key| obj.get(*key)) else {
        return Ok(None);
    };

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(id) = n.as_i64() {
                return Ok(Some(OrderId::new(id)));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.is_finite() => Ok(Some(OrderId::new(f as i64))),
                _ => Err(TimelineError::parse(format!("invalid order id {}", n))),
            }
        }
        Value::String(s) => s.parse::<OrderId>().map(Some),
        other => Err(TimelineError::parse(format!("invalid order id {}", other))),
    }
}

/// Null and empty strings mean "not recorded yet"
fn parse_cell(value: &Value) -> TimelineResult<Option<Timestamp>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Timestamp::parse(s).map(Some),
        other => {
            warn!("Rejecting non-string timestamp cell: {}", other);
            Err(TimelineError::parse(format!(
                "expected a timestamp string, found {}",
                other
            )))
        }
    }
}
