use crate::catalog::DatasetCatalog;
use serde::{Deserialize, Serialize};

/// Fixed, labelled group of fields shown together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    pub fields: Vec<String>,
}

impl Section {
    pub fn new<S: Into<String>>(label: impl Into<String>, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            label: label.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    /// Curated fields with the strongest price signal.
    Quick,
    /// Every field in the catalog.
    Full,
}

impl std::str::FromStr for FormMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quick" => Ok(FormMode::Quick),
            "full" => Ok(FormMode::Full),
            other => Err(format!("unknown form mode '{}', expected quick or full", other)),
        }
    }
}

impl FormMode {
    pub fn sections(self, catalog: &DatasetCatalog, full_section_size: usize) -> Vec<Section> {
        match self {
            FormMode::Quick => quick_sections(),
            FormMode::Full => full_sections(catalog, full_section_size),
        }
    }
}

pub fn quick_sections() -> Vec<Section> {
    vec![
        Section::new(
            "Size & Layout",
            [
                "TotalSF",
                "GrLivArea",
                "1stFlrSF",
                "2ndFlrSF",
                "LotArea",
                "BsmtFinSF1",
                "TotalPorchSF",
            ],
        ),
        Section::new(
            "Quality & Rooms",
            [
                "OverallQual",
                "OverallCond",
                "TotalBath",
                "RoomsPlusBathEq",
                "Fireplaces",
                "CentralAir",
            ],
        ),
        Section::new(
            "Age & Remodel",
            ["YearBuilt", "YearRemodAdd", "HouseAge", "RemodAge"],
        ),
        Section::new(
            "Garage & Sale",
            [
                "GarageArea",
                "GarageCars",
                "GarageScore",
                "Neighborhood",
                "SaleCondition",
            ],
        ),
    ]
}

/// Chunks every catalog field into sections of `size` (at least one field each).
pub fn full_sections(catalog: &DatasetCatalog, size: usize) -> Vec<Section> {
    let fields = catalog.all_fields();
    let size = size.max(1);
    let total = fields.len().div_ceil(size);
    fields
        .chunks(size)
        .enumerate()
        .map(|(i, chunk)| Section::new(format!("Part {} of {}", i + 1, total), chunk.iter().cloned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_sections_layout() {
        let sections = quick_sections();
        assert_eq!(sections.len(), 4);
        let total: usize = sections.iter().map(|s| s.fields.len()).sum();
        assert_eq!(total, 22);
        assert_eq!(sections[3].label, "Garage & Sale");
    }

    #[test]
    fn test_full_sections_chunking() {
        let catalog = DatasetCatalog::from_json(
            r#"{"numeric_means": {"A": 1.0, "B": 2.0, "C": 3.0},
                "categorical_uniques": {"D": ["x"], "E": ["y"]}}"#,
        )
        .unwrap();
        let sections = full_sections(&catalog, 2);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].fields, vec!["A", "B"]);
        assert_eq!(sections[2].fields, vec!["E"]);
        assert_eq!(sections[2].label, "Part 3 of 3");

        // zero is treated as one field per section
        assert_eq!(full_sections(&catalog, 0).len(), 5);
    }

    #[test]
    fn test_full_sections_follow_catalog_order() {
        let catalog = DatasetCatalog::from_json(
            r#"{"numeric_means": {"LotArea": 1.0, "GrLivArea": 2.0},
                "categorical_uniques": {"Street": ["Pave"], "Alley": ["Grvl"]}}"#,
        )
        .unwrap();
        let sections = full_sections(&catalog, 3);
        assert_eq!(sections[0].fields, vec!["LotArea", "GrLivArea", "Street"]);
        assert_eq!(sections[1].fields, vec!["Alley"]);
    }

    #[test]
    fn test_form_mode_parse() {
        assert_eq!("Quick".parse::<FormMode>(), Ok(FormMode::Quick));
        assert_eq!("full".parse::<FormMode>(), Ok(FormMode::Full));
        assert!("both".parse::<FormMode>().is_err());
    }
}
