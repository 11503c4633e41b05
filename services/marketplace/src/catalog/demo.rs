//! Canned listing used by demo autofill for the quick form

use crate::form::FieldValue;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static QUICK_DEMO: Lazy<BTreeMap<String, FieldValue>> = Lazy::new(|| {
    let numeric: [(&str, f64); 20] = [
        ("TotalSF", 2566.0),
        ("OverallQual", 7.0),
        ("OverallCond", 5.0),
        ("GrLivArea", 1710.0),
        ("TotalBath", 3.5),
        ("LotArea", 8450.0),
        ("YearBuilt", 2003.0),
        ("RemodAge", 5.0),
        ("YearRemodAdd", 2003.0),
        ("1stFlrSF", 856.0),
        ("HouseAge", 5.0),
        ("GarageArea", 548.0),
        ("GarageScore", 12.0),
        ("BsmtFinSF1", 706.0),
        ("TotalPorchSF", 61.0),
        ("GarageCars", 2.0),
        ("2ndFlrSF", 854.0),
        ("Fireplaces", 0.0),
        ("RoomsPlusBathEq", 11.5),
        ("MoSold", 2.0),
    ];
    let categorical = [
        ("Neighborhood", "CollgCr"),
        ("CentralAir", "Y"),
        ("SaleCondition", "Normal"),
    ];

    numeric
        .into_iter()
        .map(|(field, value)| (field.to_string(), FieldValue::Number(value)))
        .chain(
            categorical
                .into_iter()
                .map(|(field, value)| (field.to_string(), FieldValue::Text(value.to_string()))),
        )
        .collect()
});

/// Built-in demo record keyed by display identifier.
pub fn quick_demo_record() -> &'static BTreeMap<String, FieldValue> {
    &QUICK_DEMO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::section::quick_sections;

    #[test]
    fn test_demo_covers_every_quick_field() {
        let record = quick_demo_record();
        for section in quick_sections() {
            for field in &section.fields {
                assert!(
                    record.get(field).map_or(false, |v| !v.is_empty()),
                    "missing demo value for {}",
                    field
                );
            }
        }
    }

    #[test]
    fn test_demo_areas_are_consistent() {
        let record = quick_demo_record();
        let first = record["1stFlrSF"].as_f64().unwrap();
        let second = record["2ndFlrSF"].as_f64().unwrap();
        assert_eq!(record["GrLivArea"].as_f64(), Some(first + second));
    }
}
