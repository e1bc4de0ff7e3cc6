//! Plain-data view of a configuration
//!
//! [`NativeValue`] is what the native accessors hand out: no
//! element lists and no placeholders, just scalars, lists and ordered maps.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Ordered map of native values
pub type NativeMap = IndexMap<String, NativeValue>;

/// Unwrapped configuration data
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    List(Vec<NativeValue>),
    Map(NativeMap),
    /// Only produced for placeholders that were never resolved
    Null,
}

impl NativeValue {
    pub fn is_map(&self) -> bool {
        matches!(self, NativeValue::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NativeValue::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        if let NativeValue::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let NativeValue::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            NativeValue::Float(f) => Some(*f),
            NativeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let NativeValue::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[NativeValue]> {
        if let NativeValue::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_map(&self) -> Option<&NativeMap> {
        if let NativeValue::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    pub(crate) fn as_map_mut(&mut self) -> Option<&mut NativeMap> {
        if let NativeValue::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Converts to a `serde_json::Value`
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            NativeValue::String(s) => serde_json::Value::String(s.clone()),
            NativeValue::Boolean(b) => serde_json::Value::Bool(*b),
            NativeValue::Integer(i) => serde_json::Value::from(*i),
            NativeValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            NativeValue::List(items) => {
                serde_json::Value::Array(items.iter().map(NativeValue::to_json).collect())
            }
            NativeValue::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            NativeValue::Null => serde_json::Value::Null,
        }
    }
}

impl Serialize for NativeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NativeValue::String(s) => serializer.serialize_str(s),
            NativeValue::Boolean(b) => serializer.serialize_bool(*b),
            NativeValue::Integer(i) => serializer.serialize_i64(*i),
            NativeValue::Float(f) => serializer.serialize_f64(*f),
            NativeValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            NativeValue::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            NativeValue::Null => serializer.serialize_unit(),
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = if f.alternate() {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        f.write_str(&rendered.map_err(|_| fmt::Error)?)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::String(value.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        NativeValue::String(value)
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        NativeValue::Boolean(value)
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        NativeValue::Integer(value)
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        NativeValue::Float(value)
    }
}

impl From<Vec<NativeValue>> for NativeValue {
    fn from(value: Vec<NativeValue>) -> Self {
        NativeValue::List(value)
    }
}

impl From<NativeMap> for NativeValue {
    fn from(value: NativeMap) -> Self {
        NativeValue::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_preserves_key_order() {
        let mut map = NativeMap::new();
        map.insert("zeta".to_string(), NativeValue::Integer(1));
        map.insert("alpha".to_string(), NativeValue::from(vec![
            NativeValue::Boolean(true),
            NativeValue::from("x"),
        ]));

        let json = serde_json::to_string(&NativeValue::Map(map)).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":[true,"x"]}"#);
    }

    #[test]
    fn test_to_json_matches_serialize() {
        let mut map = NativeMap::new();
        map.insert("pi".to_string(), NativeValue::Float(3.5));
        map.insert("name".to_string(), NativeValue::from("demo"));
        let value = NativeValue::Map(map);

        assert_eq!(value.to_json(), serde_json::to_value(&value).unwrap());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(NativeValue::Integer(3).as_float(), Some(3.0));
        assert_eq!(NativeValue::from("s").as_integer(), None);
        assert!(NativeValue::List(Vec::new()).is_list());
        assert_eq!(NativeValue::Boolean(false).as_bool(), Some(false));
    }
}
