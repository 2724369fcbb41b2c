use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a timestamp given either as Unix milliseconds or an RFC3339 string
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(s) => s.parse::<DateTime<Utc>>().ok(),
        _ => None,
    }
}

/// Lenient optional timestamp: anything undecodable becomes `None` instead of an error
///
/// A bad timestamp should never cost a transcript record its turn.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}
