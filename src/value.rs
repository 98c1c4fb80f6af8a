use crate::bridge::BridgeOptions;
use crate::error::BridgeError;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

// Largest integer magnitude an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Canonical value tree every host value is normalized into before decoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The number as an integer, if it is integral and exactly representable.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => Some(*n as i64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convenience over [`normalize`] for JSON input.
    pub fn from_json(value: &serde_json::Value) -> Result<Value, BridgeError> {
        normalize(value, &BridgeOptions::default())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match self.as_i64() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Shallow classification of a host value.
#[derive(Debug)]
pub enum HostShape<H> {
    String(String),
    Number(f64),
    Boolean(bool),
    Array(Vec<H>),
    Map(Vec<(String, H)>),
    Other,
}

/// A value owned by a foreign runtime that can be inspected one level at a time.
///
/// Implementations report failures to read the host value (throwing getters,
/// failed conversions) as [`HostShape::Other`].
pub trait HostValue: Sized {
    fn shape(&self) -> HostShape<Self>;
}

impl<'a> HostValue for &'a serde_json::Value {
    fn shape(&self) -> HostShape<Self> {
        match self {
            serde_json::Value::String(s) => HostShape::String(s.clone()),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(n) => HostShape::Number(n),
                None => HostShape::Other,
            },
            serde_json::Value::Bool(b) => HostShape::Boolean(*b),
            serde_json::Value::Array(items) => HostShape::Array(items.iter().collect()),
            serde_json::Value::Object(map) => {
                HostShape::Map(map.iter().map(|(k, v)| (k.clone(), v)).collect())
            }
            serde_json::Value::Null => HostShape::Other,
        }
    }
}

impl<'a> HostValue for &'a Value {
    fn shape(&self) -> HostShape<Self> {
        match self {
            Value::String(s) => HostShape::String(s.clone()),
            Value::Number(n) => HostShape::Number(*n),
            Value::Bool(b) => HostShape::Boolean(*b),
            Value::Array(items) => HostShape::Array(items.iter().collect()),
            Value::Map(map) => HostShape::Map(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
            Value::Null => HostShape::Other,
        }
    }
}

/// Converts a host value into a canonical [`Value`].
///
/// The host value must be acyclic; there is no cycle detection. Nesting is
/// bounded by [`BridgeOptions::max_value_depth`], so a cyclic value ends in
/// [`BridgeError::DepthExceeded`] instead of exhausting the stack.
///
/// The bound covers the whole value, including payload fields that decoding
/// ignores: a node carrying an unused field nested past the ceiling fails
/// the call rather than having the field skipped.
pub fn normalize<H: HostValue>(value: H, options: &BridgeOptions) -> Result<Value, BridgeError> {
    normalize_at(value, 1, options)
}

fn normalize_at<H: HostValue>(
    value: H,
    depth: usize,
    options: &BridgeOptions,
) -> Result<Value, BridgeError> {
    if depth > options.max_value_depth() {
        return Err(BridgeError::DepthExceeded {
            limit: options.max_depth,
        });
    }

    let normalized = match value.shape() {
        HostShape::String(s) => Value::String(s),
        HostShape::Number(n) => Value::Number(n),
        HostShape::Boolean(b) => Value::Bool(b),
        HostShape::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize_at(item, depth + 1, options))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        HostShape::Map(entries) => {
            let mut map = BTreeMap::new();
            for (key, item) in entries {
                map.insert(key, normalize_at(item, depth + 1, options)?);
            }
            Value::Map(map)
        }
        HostShape::Other => Value::Null,
    };
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_every_json_shape() {
        let input = json!({
            "s": "x",
            "n": 1.5,
            "i": 3,
            "b": true,
            "a": [1, "two", null],
            "m": { "k": false },
            "z": null
        });
        let value = Value::from_json(&input).unwrap();
        let map = value.as_map().unwrap();

        assert_eq!(map["s"], Value::from("x"));
        assert_eq!(map["n"], Value::Number(1.5));
        assert_eq!(map["i"], Value::Number(3.0));
        assert_eq!(map["b"], Value::Bool(true));
        assert_eq!(
            map["a"],
            Value::Array(vec![Value::Number(1.0), Value::from("two"), Value::Null])
        );
        assert_eq!(map["m"].as_map().unwrap()["k"], Value::Bool(false));
        assert!(map["z"].is_null());
    }

    #[test]
    fn serializes_integral_numbers_as_integers() {
        let value = Value::Array(vec![
            Value::Number(1.0),
            Value::Number(-2.0),
            Value::Number(0.25),
        ]);
        assert_eq!(serde_json::to_value(&value).unwrap(), json!([1, -2, 0.25]));
    }

    #[test]
    fn as_i64_rejects_fractions_and_huge_values() {
        assert_eq!(Value::Number(4.0).as_i64(), Some(4));
        assert_eq!(Value::Number(4.5).as_i64(), None);
        assert_eq!(Value::Number(1e300).as_i64(), None);
        assert_eq!(Value::Number(f64::NAN).as_i64(), None);
        assert_eq!(Value::from("4").as_i64(), None);
    }

    #[test]
    fn nesting_past_the_ceiling_is_a_fault() {
        let options = BridgeOptions::default().with_max_depth(1);
        let limit = options.max_value_depth();

        let mut deep = json!("leaf");
        for _ in 0..limit {
            deep = json!([deep]);
        }
        assert_eq!(
            normalize(&deep, &options),
            Err(BridgeError::DepthExceeded { limit: 1 })
        );

        let mut shallow = json!("leaf");
        for _ in 0..limit - 1 {
            shallow = json!([shallow]);
        }
        assert!(normalize(&shallow, &options).is_ok());
    }

    #[test]
    fn canonical_values_normalize_to_themselves() {
        let value = Value::Array(vec![Value::from("a"), Value::Bool(false), Value::Null]);
        assert_eq!(normalize(&value, &BridgeOptions::default()).unwrap(), value);
    }
}
