//! Request validation for attribute writes

use serde_json::{Map, Value};

use super::ApiError;

/// A validated attribute write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeWriteRequest {
    /// Identifier from the request path
    pub external_id: String,
    /// Attribute id
    pub key: u16,
    pub value: u8,
}

/// Parse and type-check a raw request body
///
/// Both `key` and `value` must be JSON integers that fit their target width.
/// Anything else (strings, fractions, negatives, overflow, null) is rejected
/// rather than coerced. Unknown fields are ignored.
///
/// # Errors
///
/// `InvalidJson` when the body is not a non-empty JSON object, `InvalidValue`
/// when a field is missing or out of range. Missing fields are reported
/// before range problems, `key` before `value`.
pub fn parse_request(external_id: &str, body: &[u8]) -> Result<AttributeWriteRequest, ApiError> {
    let map = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => map,
        _ => return Err(ApiError::invalid_json(external_id)),
    };

    let raw_key = required(&map, "key", external_id)?;
    let raw_value = required(&map, "value", external_id)?;

    Ok(AttributeWriteRequest {
        external_id: external_id.to_string(),
        key: integer(raw_key, "key", external_id)?,
        value: integer(raw_value, "value", external_id)?,
    })
}

fn required<'a>(map: &'a Map<String, Value>, field: &str, id: &str) -> Result<&'a Value, ApiError> {
    map.get(field)
        .ok_or_else(|| ApiError::invalid_value(id, format!("{field} is required")))
}

fn integer<T: TryFrom<u64>>(raw: &Value, field: &str, id: &str) -> Result<T, ApiError> {
    raw.as_u64()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| {
            ApiError::invalid_value(id, format!("invalid value, {raw}, for parameter, {field}"))
        })
}
