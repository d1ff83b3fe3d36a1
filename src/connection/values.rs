//! Conversion between JSON values and DuckDB values

use crate::types::JsonValue;
use base64::Engine as _;
use duckdb::types::{TimeUnit, Value};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Text DuckDB uses for its infinite dates and timestamps
const INFINITY: &str = "infinity";
const NEG_INFINITY: &str = "-infinity";

/// Convert a binding into a DuckDB parameter value
pub fn json_to_duckdb(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::BigInt(i)
            } else if let Some(u) = n.as_u64() {
                Value::UBigInt(u)
            } else {
                Value::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => Value::Text(value.to_string()),
    }
}

/// Convert a DuckDB result value to JSON
pub fn duckdb_to_json(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(b),
        Value::TinyInt(i) => JsonValue::Number(i.into()),
        Value::SmallInt(i) => JsonValue::Number(i.into()),
        Value::Int(i) => JsonValue::Number(i.into()),
        Value::BigInt(i) => JsonValue::Number(i.into()),
        Value::HugeInt(i) => JsonValue::String(i.to_string()),
        Value::UTinyInt(i) => JsonValue::Number(i.into()),
        Value::USmallInt(i) => JsonValue::Number(i.into()),
        Value::UInt(i) => JsonValue::Number(i.into()),
        Value::UBigInt(i) => JsonValue::Number(i.into()),
        Value::Float(f) => float_to_json(f64::from(f)),
        Value::Double(f) => float_to_json(f),
        Value::Decimal(d) => {
            // Only decimals that survive the trip through f64 become numbers
            let text = d.normalize().to_string();
            text.parse::<f64>()
                .ok()
                .filter(|f| f.to_string() == text)
                .and_then(serde_json::Number::from_f64)
                .map_or(JsonValue::String(d.to_string()), JsonValue::Number)
        }
        Value::Text(s) | Value::Enum(s) => JsonValue::String(s),
        Value::Blob(b) => JsonValue::String(base64::engine::general_purpose::STANDARD.encode(b)),
        Value::Timestamp(_, i64::MAX) => JsonValue::String(INFINITY.to_string()),
        Value::Timestamp(_, t) if t == -i64::MAX => JsonValue::String(NEG_INFINITY.to_string()),
        Value::Timestamp(unit, t) => to_micros(unit, t)
            .and_then(|micros| {
                let secs = micros.div_euclid(1_000_000);
                let nsecs = (micros.rem_euclid(1_000_000) * 1000) as u32;
                chrono::DateTime::from_timestamp(secs, nsecs)
            })
            .map_or(JsonValue::Number(t.into()), |dt| {
                JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
            }),
        Value::Date32(i32::MAX) => JsonValue::String(INFINITY.to_string()),
        Value::Date32(d) if d == -i32::MAX => JsonValue::String(NEG_INFINITY.to_string()),
        Value::Date32(d) => d
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(chrono::NaiveDate::from_num_days_from_ce_opt)
            .map_or(JsonValue::Number(d.into()), |date| {
                JsonValue::String(date.format("%Y-%m-%d").to_string())
            }),
        Value::Time64(unit, t) => to_micros(unit, t).map_or(JsonValue::Number(t.into()), |micros| {
            let secs = micros / 1_000_000;
            JsonValue::String(format!(
                "{:02}:{:02}:{:02}.{:06}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                micros % 1_000_000
            ))
        }),
        Value::List(items) => JsonValue::Array(items.into_iter().map(duckdb_to_json).collect()),
        other => JsonValue::String(format!("{other:?}")),
    }
}

fn float_to_json(f: f64) -> JsonValue {
    serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
}

/// Microseconds for a temporal value, `None` when it does not fit in an i64
fn to_micros(unit: TimeUnit, value: i64) -> Option<i64> {
    match unit {
        TimeUnit::Second => value.checked_mul(1_000_000),
        TimeUnit::Millisecond => value.checked_mul(1_000),
        TimeUnit::Microsecond => Some(value),
        TimeUnit::Nanosecond => Some(value / 1_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_duckdb() {
        assert_eq!(json_to_duckdb(&JsonValue::Null), Value::Null);
        assert_eq!(json_to_duckdb(&json!(true)), Value::Boolean(true));
        assert_eq!(json_to_duckdb(&json!(-3)), Value::BigInt(-3));
        assert_eq!(json_to_duckdb(&json!(u64::MAX)), Value::UBigInt(u64::MAX));
        assert_eq!(json_to_duckdb(&json!(1.5)), Value::Double(1.5));
        assert_eq!(json_to_duckdb(&json!("x")), Value::Text("x".to_string()));
        assert_eq!(
            json_to_duckdb(&json!({"a": 1})),
            Value::Text("{\"a\":1}".to_string())
        );
    }

    #[test]
    fn test_duckdb_to_json_scalars() {
        assert_eq!(duckdb_to_json(Value::Null), JsonValue::Null);
        assert_eq!(duckdb_to_json(Value::Int(42)), json!(42));
        assert_eq!(duckdb_to_json(Value::HugeInt(7)), json!("7"));
        assert_eq!(duckdb_to_json(Value::Double(f64::NAN)), JsonValue::Null);
        assert_eq!(duckdb_to_json(Value::Blob(vec![1, 2, 3])), json!("AQID"));
    }

    #[test]
    fn test_duckdb_to_json_temporal() {
        assert_eq!(duckdb_to_json(Value::Date32(0)), json!("1970-01-01"));
        assert_eq!(
            duckdb_to_json(Value::Timestamp(TimeUnit::Microsecond, 1_500_000)),
            json!("1970-01-01T00:00:01.500000Z")
        );
        assert_eq!(
            duckdb_to_json(Value::Time64(TimeUnit::Microsecond, 3_723_000_001)),
            json!("01:02:03.000001")
        );
    }

    #[test]
    fn test_duckdb_to_json_infinite_temporals() {
        assert_eq!(duckdb_to_json(Value::Date32(i32::MAX)), json!("infinity"));
        assert_eq!(duckdb_to_json(Value::Date32(-i32::MAX)), json!("-infinity"));
        assert_eq!(
            duckdb_to_json(Value::Timestamp(TimeUnit::Second, -i64::MAX)),
            json!("-infinity")
        );
        assert_eq!(
            duckdb_to_json(Value::Timestamp(TimeUnit::Microsecond, i64::MAX)),
            json!("infinity")
        );
    }

    #[test]
    fn test_duckdb_to_json_out_of_range_temporals_fall_back_to_numbers() {
        let huge = i64::MAX / 10;
        assert_eq!(
            duckdb_to_json(Value::Timestamp(TimeUnit::Second, huge)),
            json!(huge)
        );
        assert_eq!(
            duckdb_to_json(Value::Time64(TimeUnit::Second, huge)),
            json!(huge)
        );
        assert_eq!(duckdb_to_json(Value::Date32(i32::MAX - 1)), json!(i32::MAX - 1));
    }

    #[test]
    fn test_duckdb_to_json_list() {
        let list = Value::List(vec![Value::Int(1), Value::Null]);
        assert_eq!(duckdb_to_json(list), json!([1, null]));
    }
}
