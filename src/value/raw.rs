use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Dynamically typed value taken from the input dataset.
///
/// This is a closed set: coercion matches on it exhaustively instead of
/// inspecting runtime types.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Absent value
    Null,
    /// Integral number (wide enough for every JSON integer)
    Integer(i128),
    /// Non-integral number
    Float(f64),
    /// Boolean
    Boolean(bool),
    /// Text
    Text(String),
    /// Raw bytes (only reachable through the library API)
    Bytes(Vec<u8>),
    /// Keyed members in insertion order
    Object(Vec<(String, RawValue)>),
    /// Ordered elements
    Array(Vec<RawValue>),
}

impl RawValue {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Integer(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::Boolean(_) => "boolean",
            RawValue::Text(_) => "text",
            RawValue::Bytes(_) => "bytes",
            RawValue::Object(_) => "object",
            RawValue::Array(_) => "array",
        }
    }

    /// True for [`RawValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Member lookup for objects
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        match self {
            RawValue::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Build an object from `(key, value)` pairs
    pub fn object<K: Into<String>>(members: impl IntoIterator<Item = (K, RawValue)>) -> Self {
        RawValue::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert back into a JSON tree.
    ///
    /// Bytes become an array of numbers; integers outside the 64-bit range
    /// become strings.
    pub fn to_json(&self) -> Value {
        match self {
            RawValue::Null => Value::Null,
            RawValue::Integer(i) => {
                if let Ok(v) = i64::try_from(*i) {
                    Value::Number(v.into())
                } else if let Ok(v) = u64::try_from(*i) {
                    Value::Number(v.into())
                } else {
                    Value::String(i.to_string())
                }
            }
            RawValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            RawValue::Boolean(b) => Value::Bool(*b),
            RawValue::Text(s) => Value::String(s.clone()),
            RawValue::Bytes(bytes) => {
                Value::Array(bytes.iter().map(|b| Value::Number((*b).into())).collect())
            }
            RawValue::Object(members) => {
                let map: Map<String, Value> =
                    members.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                Value::Object(map)
            }
            RawValue::Array(items) => Value::Array(items.iter().map(RawValue::to_json).collect()),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Boolean(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Integer(i as i128)
                } else if let Some(u) = n.as_u64() {
                    RawValue::Integer(u as i128)
                } else {
                    RawValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => RawValue::Text(s),
            Value::Array(items) => RawValue::Array(items.into_iter().map(RawValue::from).collect()),
            Value::Object(map) => {
                RawValue::Object(map.into_iter().map(|(k, v)| (k, RawValue::from(v))).collect())
            }
        }
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Integer(value as i128)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value as i128)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Boolean(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(value: Vec<u8>) -> Self {
        RawValue::Bytes(value)
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RawValue::from)
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
