//! Dataset-derived field catalog: numeric means and categorical option sets

pub mod demo;

use crate::error::FlowError;
use crate::form::FieldValue;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub use demo::quick_demo_record;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Numeric,
    /// Ordered set of legal option values.
    Categorical(Vec<String>),
}

/// Immutable description of one form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, FieldKind::Numeric)
    }

    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::Categorical(options) => options,
            FieldKind::Numeric => &[],
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    numeric_means: serde_json::Map<String, Value>,
    #[serde(default)]
    categorical_uniques: serde_json::Map<String, Value>,
    #[serde(default)]
    demo_record: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    numeric_means: BTreeMap<String, f64>,
    categorical_uniques: BTreeMap<String, Vec<String>>,
    demo_record: BTreeMap<String, FieldValue>,
    /// Field names in the order the catalog file lists them.
    numeric_order: Vec<String>,
    categorical_order: Vec<String>,
}

impl DatasetCatalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FlowError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            FlowError::Catalog(format!("failed to read {:?}: {}", path.as_ref(), e))
        })?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(
            "Loaded catalog with {} numeric and {} categorical fields",
            catalog.numeric_means.len(),
            catalog.categorical_uniques.len()
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self, FlowError> {
        let raw: RawCatalog = serde_json::from_str(content)
            .map_err(|e| FlowError::Catalog(format!("invalid catalog json: {}", e)))?;

        let mut catalog = DatasetCatalog::default();
        for (field, mean) in raw.numeric_means {
            // null means (all-missing columns) are skipped
            if let Some(mean) = mean.as_f64() {
                if catalog.numeric_means.insert(field.clone(), mean).is_none() {
                    catalog.numeric_order.push(field);
                }
            }
        }
        for (field, options) in raw.categorical_uniques {
            let options: Vec<String> = match options {
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect(),
                _ => {
                    return Err(FlowError::Catalog(format!(
                        "categorical_uniques.{} is not a list",
                        field
                    )))
                }
            };
            if catalog.categorical_uniques.insert(field.clone(), options).is_none() {
                catalog.categorical_order.push(field);
            }
        }
        if let Some(record) = raw.demo_record {
            catalog.demo_record = record
                .iter()
                .map(|(field, value)| (field.clone(), FieldValue::from_json(value)))
                .collect();
        }
        Ok(catalog)
    }

    pub fn numeric_mean(&self, field: &str) -> Option<f64> {
        self.numeric_means.get(field).copied()
    }

    pub fn options(&self, field: &str) -> Option<&[String]> {
        self.categorical_uniques.get(field).map(Vec::as_slice)
    }

    /// Numeric when the field has a mean; categorical when it only has options.
    /// Unknown fields are treated as numeric.
    pub fn field_spec(&self, field: &str) -> FieldSpec {
        let kind = if self.numeric_means.contains_key(field) {
            FieldKind::Numeric
        } else if let Some(options) = self.categorical_uniques.get(field) {
            FieldKind::Categorical(options.clone())
        } else {
            FieldKind::Numeric
        };
        FieldSpec {
            name: field.to_string(),
            kind,
        }
    }

    /// Numeric fields first, then categorical fields that have no mean, each
    /// group in catalog file order.
    pub fn all_fields(&self) -> Vec<String> {
        self.numeric_order
            .iter()
            .chain(
                self.categorical_order
                    .iter()
                    .filter(|f| !self.numeric_means.contains_key(f.as_str())),
            )
            .cloned()
            .collect()
    }

    /// Canned value for `field`: the catalog's own demo record wins over the built-in one.
    pub fn demo_value(&self, field: &str) -> Option<FieldValue> {
        self.demo_record
            .get(field)
            .cloned()
            .or_else(|| quick_demo_record().get(field).cloned())
            .filter(|value| !value.is_empty())
    }
}
