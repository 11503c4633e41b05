//! Projection of the preference form onto the wire format

use super::fields::{
    PreferenceKind, MAX_TOTAL_SF, MIN_TOTAL_SF, PREFERENCE_FIELDS, TOTAL_SF_MAX_COMPONENTS,
    TOTAL_SF_MIN_COMPONENTS,
};
use crate::form::{FieldValue, FormState};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Sanitized buyer preferences: every declared key present, typed or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceQuery {
    fields: Map<String, Value>,
}

impl PreferenceQuery {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_null(&self, key: &str) -> bool {
        self.fields.get(key).map_or(true, Value::is_null)
    }

    /// Number of constraints that are actually set.
    pub fn active_count(&self) -> usize {
        self.fields.values().filter(|v| !v.is_null()).count()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Builds the query from `form`. Ranges are not re-validated here; run
/// [`super::validate::is_valid`] first.
pub fn build_query(form: &FormState) -> PreferenceQuery {
    let mut fields = Map::new();
    for field in PREFERENCE_FIELDS {
        let value = form.value(field.key);
        let projected = match field.kind {
            PreferenceKind::Float => float_value(value),
            PreferenceKind::Integer => value.as_i64().map(Value::from).unwrap_or(Value::Null),
            PreferenceKind::Categorical => value.as_text().map(Value::String).unwrap_or(Value::Null),
            PreferenceKind::Flag => flag_value(value),
        };
        fields.insert(field.key.to_string(), projected);
    }

    fields.insert(
        MIN_TOTAL_SF.to_string(),
        sum_components(form, &TOTAL_SF_MIN_COMPONENTS).map_or(Value::Null, f64_value),
    );
    fields.insert(
        MAX_TOTAL_SF.to_string(),
        sum_components(form, &TOTAL_SF_MAX_COMPONENTS).map_or(Value::Null, f64_value),
    );

    PreferenceQuery { fields }
}

/// Sum of the three area components, only when all three are present and numeric.
pub fn sum_components(form: &FormState, keys: &[&str; 3]) -> Option<f64> {
    keys.iter()
        .map(|key| form.value(key).as_f64())
        .sum::<Option<f64>>()
}

fn float_value(value: &FieldValue) -> Value {
    value.as_f64().map_or(Value::Null, f64_value)
}

fn f64_value(n: f64) -> Value {
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

fn flag_value(value: &FieldValue) -> Value {
    let Some(text) = value.as_text() else {
        return Value::Null;
    };
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "si" | "sí" => Value::Bool(true),
        "false" | "no" | "n" | "0" => Value::Bool(false),
        other => {
            tracing::warn!("Ignoring unrecognized yes/no value {:?}", other);
            Value::Null
        }
    }
}
