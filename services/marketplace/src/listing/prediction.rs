use crate::catalog::DatasetCatalog;
use crate::form::FormState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Body of the price prediction call, keyed by display identifier.
///
/// Numeric fields are forced to floats (0.0 when the input is not a number);
/// categorical fields pass through as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRequest {
    fields: Map<String, Value>,
}

impl PredictionRequest {
    pub fn build<S: AsRef<str>>(
        fields: &[S],
        form: &FormState,
        catalog: &DatasetCatalog,
    ) -> Self {
        let mut out = Map::new();
        for field in fields {
            let field = field.as_ref();
            let value = form.value(field);
            let projected = if catalog.field_spec(field).is_numeric() {
                let n = value.as_f64().unwrap_or(0.0);
                Value::Number(Number::from_f64(n).unwrap_or_else(|| Number::from(0)))
            } else {
                value.to_json()
            };
            out.insert(field.to_string(), projected);
        }
        Self { fields: out }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
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

/// Model output; only the price and model tag are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedPrice {
    pub predicted_price: f64,
    pub model_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> DatasetCatalog {
        DatasetCatalog::from_json(
            r#"{"numeric_means": {"LotArea": 10000.0, "GrLivArea": 1500.0},
                "categorical_uniques": {"Neighborhood": ["NAmes", "OldTown"]}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_fields_forced_to_float() {
        let mut form = FormState::new();
        form.set("LotArea", "8450");
        form.set("GrLivArea", "big");
        form.set("Neighborhood", "NAmes");

        let request = PredictionRequest::build(
            &["LotArea", "GrLivArea", "Neighborhood", "TotalSF"],
            &form,
            &catalog(),
        );
        assert_eq!(request.get("LotArea"), Some(&Value::from(8450.0)));
        assert_eq!(request.get("GrLivArea"), Some(&Value::from(0.0)));
        assert_eq!(request.get("Neighborhood"), Some(&Value::from("NAmes")));
        // unknown to the catalog, so numeric and defaulted
        assert_eq!(request.get("TotalSF"), Some(&Value::from(0.0)));
    }

    #[test]
    fn test_empty_categorical_is_null() {
        let request = PredictionRequest::build(&["Neighborhood"], &FormState::new(), &catalog());
        assert_eq!(request.get("Neighborhood"), Some(&Value::Null));
    }

    #[test]
    fn test_keys_stay_display_names() {
        let mut form = FormState::new();
        form.set("1stFlrSF", 856.0);
        let request = PredictionRequest::build(&["1stFlrSF"], &form, &catalog());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["1stFlrSF"], Value::from(856.0));
    }

    #[test]
    fn test_prediction_ignores_extra_fields() {
        let parsed: PredictedPrice = serde_json::from_str(
            r#"{"predicted_price": 250000.5, "model_type": "gbr", "features_used": 22}"#,
        )
        .unwrap();
        assert_eq!(parsed.predicted_price, 250000.5);
        assert_eq!(parsed.model_type, "gbr");
    }
}
