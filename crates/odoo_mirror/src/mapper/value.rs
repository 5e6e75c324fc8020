//! Field extraction helpers shared by the mappers.

use chrono::NaiveDate;
use serde_json::Value;

use super::{MapError, Result};
use crate::remote::RemoteRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(super) fn require_id(record: &RemoteRecord) -> Result<i64> {
    match record.raw("id") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(MapError::missing("id")),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| MapError::invalid("id", format!("expected an integer, got {value}"))),
    }
}

/// A text column; empty strings count as missing.
pub(super) fn optional_string(record: &RemoteRecord, field: &str) -> Result<Option<String>> {
    match record.get(field) {
        None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(MapError::invalid(field, format!("expected text, got {other}"))),
    }
}

/// A many2one reference, delivered by Odoo as `[id, "display name"]`.
pub(super) fn many2one(record: &RemoteRecord, field: &str) -> Result<Option<(i64, Option<String>)>> {
    let Some(value) = record.get(field) else {
        return Ok(None);
    };

    let pair = value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| MapError::invalid(field, format!("expected [id, name], got {value}")))?;

    let id = pair[0]
        .as_i64()
        .ok_or_else(|| MapError::invalid(field, format!("expected an integer id, got {}", pair[0])))?;
    let name = pair
        .get(1)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(Some((id, name)))
}

/// A `YYYY-MM-DD` date column.
pub(super) fn optional_date(record: &RemoteRecord, field: &str) -> Result<Option<NaiveDate>> {
    match record.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|e| MapError::invalid(field, format!("'{s}' is not a YYYY-MM-DD date: {e}"))),
        Some(other) => Err(MapError::invalid(field, format!("expected a date, got {other}"))),
    }
}

/// A numeric column, falling back to `default` when missing.
pub(super) fn number_or(record: &RemoteRecord, field: &str, default: f64) -> Result<f64> {
    match record.raw(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(default),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| MapError::invalid(field, format!("expected a number, got {value}"))),
    }
}
