//! Raw form values keyed by display identifier

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid float pattern")
});

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid int pattern"));

/// Parses the longest numeric prefix of `raw` ("12.5 sqft" -> 12.5).
///
/// Mirrors how browser number inputs hand values over: blanks and text
/// without a numeric prefix are absent, as are non-finite results.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let caps = LEADING_FLOAT.captures(raw)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Integer variant of [`parse_leading_float`]; fractional digits are dropped ("12.7" -> 12).
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let caps = LEADING_INT.captures(raw)?;
    caps.get(1)?.as_str().parse().ok()
}

/// A single raw form value as the user left it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Blank input becomes `Empty`, anything else is kept verbatim.
    pub fn from_input(raw: &str) -> Self {
        if raw.trim().is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Text(raw.to_string())
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Empty,
            serde_json::Value::String(s) => FieldValue::from_input(s),
            serde_json::Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or_default(),
            serde_json::Value::Bool(b) => FieldValue::Text(b.to_string()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Empty => None,
            FieldValue::Text(s) => parse_leading_float(s),
            FieldValue::Number(n) => n.is_finite().then_some(*n),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Empty => None,
            FieldValue::Text(s) => parse_leading_int(s),
            FieldValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            FieldValue::Number(_) => None,
        }
    }

    /// Text as entered; numbers are rendered back to their shortest form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Empty => None,
            FieldValue::Text(s) if s.trim().is_empty() => None,
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Empty => serde_json::Value::Null,
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(raw: &str) -> Self {
        FieldValue::from_input(raw)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(FieldValue::from_json(&value))
    }
}

/// Mapping from display identifier to raw value. Validity is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: HashMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: keys
                .into_iter()
                .map(|k| (k.into(), FieldValue::Empty))
                .collect(),
        }
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Value for `field`, treating absent keys as empty.
    pub fn value(&self, field: &str) -> &FieldValue {
        static EMPTY: FieldValue = FieldValue::Empty;
        self.values.get(field).unwrap_or(&EMPTY)
    }

    pub fn is_filled(&self, field: &str) -> bool {
        !self.value(field).is_empty()
    }

    /// Blanks every known key without forgetting it.
    pub fn blank_all(&mut self) {
        for value in self.values.values_mut() {
            *value = FieldValue::Empty;
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormState {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
