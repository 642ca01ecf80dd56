//! JSON to Firestore REST value encoding.
//!
//! Firestore's REST surface wraps every value in a single-key object naming
//! its type. Integers are transported as decimal strings.

use serde_json::{Map, Value, json};

/// Encodes one JSON value as a Firestore `Value`.
pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                // u64 beyond i64::MAX and all floats travel as doubles
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_firestore_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encodes a JSON object as the `fields` map of a Firestore document.
pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), to_firestore_value(value)))
        .collect()
}

/// Request body that replaces a whole document with `map`.
pub fn document_body(map: &Map<String, Value>) -> Value {
    json!({ "fields": encode_fields(map) })
}
