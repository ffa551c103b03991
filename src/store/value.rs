//! JSON to Firestore value encoding
//!
//! | JSON        | Firestore                              |
//! |-------------|----------------------------------------|
//! | null        | `nullValue`                            |
//! | bool        | `booleanValue`                         |
//! | safe int    | `integerValue` (decimal string)        |
//! | other num   | `doubleValue`                          |
//!
//! A number is a safe integer when it has no fractional part and its
//! magnitude is at most 2^53 - 1, so `1.0` is stored as the integer `1`
//! and `9007199254740993` as a double.
//! | string      | `stringValue`                          |
//! | array       | `arrayValue.values`                    |
//! | object      | `mapValue.fields`                      |

use crate::types::{JsonObject, JsonValue};
use serde_json::{json, Number};

/// Largest integer a double represents exactly, 2^53 - 1
const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Encode a JSON value as a Firestore `Value`
pub fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => match safe_integer(n) {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            let values: Vec<JsonValue> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        JsonValue::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode every field of a document body
pub fn encode_fields(fields: &JsonObject) -> JsonObject {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect()
}

fn safe_integer(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return (i.unsigned_abs() <= MAX_SAFE_INTEGER as u64).then_some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64).then_some(f as i64)
}
