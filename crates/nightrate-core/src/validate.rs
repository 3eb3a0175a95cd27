//! Response-contract enforcement and rate normalization.
//!
//! The model's payload is untrusted until it has passed through here: the
//! body is checked field by field rather than deserialized into a trusting
//! struct, because a 2xx status is no guarantee of a well-formed payload.

use serde_json::Value;

use crate::domain::RateRecord;
use crate::error::QuoteError;

/// Enforce the response contract on a raw body.
///
/// A business-level error payload (`status == "error"`) wins over shape
/// checks and may arrive on any HTTP status, including 200.
pub fn validate_response(body: &Value) -> Result<Vec<RateRecord>, QuoteError> {
    let object = body
        .as_object()
        .ok_or_else(|| QuoteError::format("response body is not a JSON object"))?;

    if object.get("status").and_then(Value::as_str) == Some("error") {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("pricing model error");
        return Err(QuoteError::model(None, message));
    }

    let rates = object
        .get("rates")
        .and_then(Value::as_array)
        .ok_or_else(|| QuoteError::format("missing rates"))?;

    rates.iter().map(validate_record).collect()
}

fn validate_record(raw: &Value) -> Result<RateRecord, QuoteError> {
    let record = raw
        .as_object()
        .ok_or_else(|| QuoteError::format("rate entry is not an object"))?;

    let period = require(record, "period")?;
    let hotel = require(record, "hotel")?;
    let room = require(record, "room")?;
    let rate = require(record, "rate")?;

    Ok(RateRecord {
        period: attr_text(period),
        hotel: attr_text(hotel),
        room: attr_text(room),
        rate: normalize_rate(rate)?,
    })
}

fn require<'v>(
    record: &'v serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<&'v Value, QuoteError> {
    record
        .get(key)
        .ok_or_else(|| QuoteError::format(format!("missing {key}")))
}

/// Normalize a raw rate value to its canonical string form.
///
/// String rates must be non-blank and are otherwise kept verbatim; no
/// numeric-format validation is applied to them. Integer rates become
/// their base-10 text. Everything else is rejected, naming the type.
pub fn normalize_rate(raw: &Value) -> Result<String, QuoteError> {
    match raw {
        Value::String(rate) => {
            if rate.trim().is_empty() {
                return Err(QuoteError::format("empty rate"));
            }
            Ok(rate.clone())
        }
        Value::Number(number) => {
            if let Some(signed) = number.as_i64() {
                Ok(signed.to_string())
            } else if let Some(unsigned) = number.as_u64() {
                Ok(unsigned.to_string())
            } else {
                Err(QuoteError::format("invalid rate type: float"))
            }
        }
        other => Err(QuoteError::format(format!(
            "invalid rate type: {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn attr_text(value: &Value) -> String {
    match value.as_str() {
        Some(text) => text.to_owned(),
        None => value.to_string(),
    }
}
