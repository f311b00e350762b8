//! Variable mapping
//!
//! Name-to-value bindings used for substitution. Values are JSON values plus an
//! explicit `Undefined` binding, which counts as present but renders as the
//! literal text `undefined`, and non-finite floats, which JSON cannot hold.

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest integer an f64 holds exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single bound value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Bound with no value
    Undefined,
    /// NaN or an infinity
    NonFinite(f64),
    Json(serde_json::Value),
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => Value::Json(serde_json::Value::Number(n)),
            None => Value::NonFinite(value),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::from(f64::from(value))
    }
}

macro_rules! impl_from_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Json(value.into())
                }
            }
        )*
    };
}

impl_from_json!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    String,
    &str,
    serde_json::Map<String, serde_json::Value>,
);

/// Substitution text: strings verbatim, numbers in their shortest form (`5`,
/// not `5.0`), `null` and `undefined` literally, NaN and infinities as `NaN`,
/// `Infinity` and `-Infinity`, objects and arrays as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::NonFinite(n) if n.is_nan() => f.write_str("NaN"),
            Value::NonFinite(n) if n.is_sign_negative() => f.write_str("-Infinity"),
            Value::NonFinite(_) => f.write_str("Infinity"),
            Value::Json(serde_json::Value::String(s)) => f.write_str(s),
            Value::Json(other) => write!(f, "{}", normalize(other)),
        }
    }
}

/// Rewrite integral floats within the exact-integer range as integers,
/// recursing into arrays and objects
fn normalize(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Number(n) => match integral(n) {
            Some(i) => serde_json::Value::Number(i.into()),
            None => value.clone(),
        },
        serde_json::Value::Array(items) => serde_json::Value::Array(items.iter().map(normalize).collect()),
        serde_json::Value::Object(map) => {
            serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), normalize(v))).collect())
        }
        other => other.clone(),
    }
}

fn integral(n: &serde_json::Number) -> Option<i64> {
    if !n.is_f64() {
        return None;
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER).then_some(f as i64)
}

/// Variable mapping supplied to a [`Prompt`](crate::Prompt)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct Variables {
    entries: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from anything that serializes to a JSON object
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(map) => Ok(map.into()),
            other => Err(serde::ser::Error::custom(format!(
                "variables must serialize to an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Bind `name`, returning the previous value if there was one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.into(), value.into())
    }

    /// Bind `name` with no value
    pub fn insert_undefined(&mut self, name: impl Into<String>) -> Option<Value> {
        self.entries.insert(name.into(), Value::Undefined)
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// True if `name` has any binding, including `null` and `Undefined`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.entries.iter()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Variables {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, Value::Json(v))).collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Variables {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::from(json!("Alice")).to_string(), "Alice");
        assert_eq!(Value::from(json!(42)).to_string(), "42");
        assert_eq!(Value::from(json!(89.99)).to_string(), "89.99");
        assert_eq!(Value::from(json!(true)).to_string(), "true");
        assert_eq!(Value::from(json!(null)).to_string(), "null");
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_integral_floats_print_as_integers() {
        assert_eq!(Value::from(5.0).to_string(), "5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(json!(5.0)).to_string(), "5");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(json!({"price": 10.0})).to_string(), r#"{"price":10}"#);
        assert_eq!(
            Value::from(json!([1.0, [2.0, {"x": 3.5}]])).to_string(),
            r#"[1,[2,{"x":3.5}]]"#
        );
    }

    #[test]
    fn test_large_integers_are_kept() {
        assert_eq!(Value::from(u64::MAX).to_string(), u64::MAX.to_string());
        assert_eq!(Value::from(9_007_199_254_740_992.0).to_string(), "9007199254740992");
    }

    #[test]
    fn test_non_finite_floats_are_not_null() {
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::from(f32::NAN).to_string(), "NaN");

        let mut vars = Variables::new();
        vars.insert("c", f64::NAN);
        assert!(matches!(vars.get("c"), Some(Value::NonFinite(n)) if n.is_nan()));
    }

    #[test]
    fn test_display_structures_are_compact() {
        assert_eq!(Value::from(json!([1, 2, 3])).to_string(), "[1,2,3]");
        assert_eq!(
            Value::from(json!({"key": "value", "count": 42})).to_string(),
            r#"{"key":"value","count":42}"#
        );
    }

    #[test]
    fn test_string_with_quotes_is_not_escaped() {
        assert_eq!(Value::from(json!("say \"hi\"")).to_string(), "say \"hi\"");
    }

    #[test]
    fn test_null_and_undefined_count_as_present() {
        let mut vars = Variables::new();
        vars.insert("n", serde_json::Value::Null);
        vars.insert_undefined("u");

        assert!(vars.contains("n"));
        assert!(vars.contains("u"));
        assert!(!vars.contains("missing"));
        assert_eq!(vars.get("u"), Some(&Value::Undefined));
    }

    #[test]
    fn test_from_iter_and_builder() {
        let vars: Variables = [("name", json!("Bob")), ("age", json!(30))].into_iter().collect();
        let built = Variables::new().with("name", "Bob").with("age", 30);
        assert_eq!(vars, built);
        assert_eq!(vars.len(), 2);
    }

    #[derive(Serialize)]
    struct Article {
        name: String,
        price: f64,
    }

    #[derive(Serialize)]
    struct ShopVars {
        articles: Vec<Article>,
        shop: &'static str,
    }

    #[test]
    fn test_from_serialize_struct() {
        let vars = Variables::from_serialize(&ShopVars {
            articles: vec![Article {
                name: "Cotton V-Neck Tee".to_string(),
                price: 24.99,
            }],
            shop: "Main Street",
        })
        .unwrap();

        assert_eq!(vars.get("shop").unwrap().to_string(), "Main Street");
        assert_eq!(
            vars.get("articles").unwrap().to_string(),
            r#"[{"name":"Cotton V-Neck Tee","price":24.99}]"#
        );
    }

    #[test]
    fn test_from_serialize_rejects_non_object() {
        let err = Variables::from_serialize(&vec![1, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let vars: Variables = serde_json::from_str(r#"{"user": "John", "count": 5}"#).unwrap();
        assert_eq!(vars.get("user").unwrap().to_string(), "John");
        assert_eq!(vars.get("count").unwrap().to_string(), "5");
    }
}
