use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::{CanonicalRecord, Fields, RecordError};

const UID_PREFIX: &str = "ical-2019-nCov-";

// iCalendar dates carry four-digit years: 1970-01-01 through 9999-12-31T23:59:59Z.
const MAX_EPOCH_SECONDS: i64 = 253_402_300_799;

/// Validates a raw API response body and normalizes its first result row.
///
/// Only `results[0]` is read; any further rows are ignored.
pub fn parse_latest<B: AsRef<[u8]>>(
    body: B,
    fields: &Fields,
) -> Result<CanonicalRecord, RecordError> {
    let payload: Value = serde_json::from_slice(body.as_ref())?;

    if !payload.get("success").is_some_and(is_truthy) {
        return Err(RecordError::ApiReportedFailure);
    }

    let Some(Value::Array(results)) = payload.get("results") else {
        return Err(RecordError::EmptyResults);
    };
    let latest = results.first().ok_or(RecordError::EmptyResults)?;

    match latest.as_object() {
        Some(row) => normalize(row, fields),
        None => normalize(&Map::new(), fields),
    }
}

/// Converts one result row into a [`CanonicalRecord`].
pub fn normalize(
    row: &Map<String, Value>,
    fields: &Fields,
) -> Result<CanonicalRecord, RecordError> {
    if let Some(missing) = fields
        .required()
        .into_iter()
        .find(|field| !row.contains_key(*field))
    {
        return Err(RecordError::MissingField {
            field: missing.to_owned(),
        });
    }

    let (updated_at_unix_timestamp, updated) = updated_at(row, &fields.updated_at)?;

    Ok(CanonicalRecord {
        confirmed: count(row, &fields.confirmed)?,
        suspected: count(row, &fields.suspected)?,
        cured: count(row, &fields.cured)?,
        dead: count(row, &fields.dead)?,
        updated_at: updated.format("%Y-%m-%d %H:%M:%S").to_string(),
        updated_at_unix_timestamp,
        uid: format!("{UID_PREFIX}{}", updated.format("%Y-%m-%d")),
    })
}

fn updated_at(
    row: &Map<String, Value>,
    field: &str,
) -> Result<(i64, DateTime<Utc>), RecordError> {
    let value = lookup(row, field)?;

    epoch_seconds(value)
        .filter(|secs| (0..=MAX_EPOCH_SECONDS).contains(secs))
        .and_then(|secs| DateTime::from_timestamp(secs, 0).map(|updated| (secs, updated)))
        .ok_or_else(|| invalid(field, value))
}

// Milliseconds to whole seconds, truncating toward zero.
fn epoch_seconds(millis: &Value) -> Option<i64> {
    if let Some(millis) = millis.as_i64() {
        return Some(millis / 1000);
    }

    let secs = (millis.as_f64()? / 1e3).trunc();
    (secs.is_finite() && secs.abs() < i64::MAX as f64).then_some(secs as i64)
}

fn count(row: &Map<String, Value>, field: &str) -> Result<u64, RecordError> {
    let value = lookup(row, field)?;
    value.as_u64().ok_or_else(|| invalid(field, value))
}

fn lookup<'a>(row: &'a Map<String, Value>, field: &str) -> Result<&'a Value, RecordError> {
    row.get(field).ok_or_else(|| RecordError::MissingField {
        field: field.to_owned(),
    })
}

fn invalid(field: &str, value: &Value) -> RecordError {
    RecordError::InvalidField {
        field: field.to_owned(),
        value: value.clone(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
