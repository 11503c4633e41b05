//! Display identifier -> wire identifier normalization
//!
//! Known dataset fields map through [`HouseField`]; anything outside the
//! catalog goes through a best-effort camel/Pascal case rewrite. The rewrite
//! is ambiguous for domain abbreviations ("1stFlrSF"), which is why every
//! field the forms actually emit is listed explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static LOWER_THEN_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid boundary pattern"));

static ACRONYM_THEN_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z0-9]+)").expect("valid acronym pattern"));

macro_rules! house_fields {
    ($($variant:ident => $display:literal, $wire:literal;)*) => {
        /// Dataset fields with a fixed wire name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HouseField {
            $($variant,)*
        }

        impl HouseField {
            pub const ALL: &'static [HouseField] = &[$(HouseField::$variant,)*];

            pub fn display_name(self) -> &'static str {
                match self {
                    $(HouseField::$variant => $display,)*
                }
            }

            pub fn wire_name(self) -> &'static str {
                match self {
                    $(HouseField::$variant => $wire,)*
                }
            }

            pub fn from_display(name: &str) -> Option<Self> {
                match name {
                    $($display => Some(HouseField::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

house_fields! {
    // quick form
    TotalSf => "TotalSF", "total_sf";
    OverallQual => "OverallQual", "overall_qual";
    OverallCond => "OverallCond", "overall_cond";
    GrLivArea => "GrLivArea", "gr_liv_area";
    Neighborhood => "Neighborhood", "neighborhood";
    TotalBath => "TotalBath", "total_bath";
    LotArea => "LotArea", "lot_area";
    CentralAir => "CentralAir", "central_air";
    YearBuilt => "YearBuilt", "year_built";
    RemodAge => "RemodAge", "remod_age";
    YearRemodAdd => "YearRemodAdd", "year_remod_add";
    FirstFlrSf => "1stFlrSF", "first_flr_sf";
    HouseAge => "HouseAge", "house_age";
    GarageArea => "GarageArea", "garage_area";
    GarageScore => "GarageScore", "garage_score";
    BsmtFinSf1 => "BsmtFinSF1", "bsmt_fin_sf1";
    SaleCondition => "SaleCondition", "sale_condition";
    TotalPorchSf => "TotalPorchSF", "total_porch_sf";
    GarageCars => "GarageCars", "garage_cars";
    SecondFlrSf => "2ndFlrSF", "second_flr_sf";
    Fireplaces => "Fireplaces", "fireplaces";
    RoomsPlusBathEq => "RoomsPlusBathEq", "rooms_plus_bath_eq";
    // full form
    MsSubClass => "MSSubClass", "ms_sub_class";
    MsZoning => "MSZoning", "ms_zoning";
    LotFrontage => "LotFrontage", "lot_frontage";
    LotShape => "LotShape", "lot_shape";
    LandContour => "LandContour", "land_contour";
    LotConfig => "LotConfig", "lot_config";
    Alley => "Alley", "alley";
    BldgType => "BldgType", "bldg_type";
    HouseStyle => "HouseStyle", "house_style";
    RoofStyle => "RoofStyle", "roof_style";
    Exterior1st => "Exterior1st", "exterior1st";
    Exterior2nd => "Exterior2nd", "exterior2nd";
    MasVnrType => "MasVnrType", "mas_vnr_type";
    MasVnrArea => "MasVnrArea", "mas_vnr_area";
    ExterQual => "ExterQual", "exter_qual";
    ExterCond => "ExterCond", "exter_cond";
    Foundation => "Foundation", "foundation";
    BsmtQual => "BsmtQual", "bsmt_qual";
    BsmtCond => "BsmtCond", "bsmt_cond";
    BsmtExposure => "BsmtExposure", "bsmt_exposure";
    BsmtFinType1 => "BsmtFinType1", "bsmt_fin_type1";
    BsmtFinType2 => "BsmtFinType2", "bsmt_fin_type2";
    BsmtFinSf2 => "BsmtFinSF2", "bsmt_fin_sf2";
    BsmtUnfSf => "BsmtUnfSF", "bsmt_unf_sf";
    TotalBsmtSf => "TotalBsmtSF", "total_bsmt_sf";
    HeatingQc => "HeatingQC", "heating_qc";
    Electrical => "Electrical", "electrical";
    OpenPorchSf => "OpenPorchSF", "open_porch_sf";
    EnclosedPorch => "EnclosedPorch", "enclosed_porch";
    ThreeSsnPorch => "ThreeSsnPorch", "three_ssn_porch";
    ScreenPorch => "ScreenPorch", "screen_porch";
    PoolArea => "PoolArea", "pool_area";
    PoolQc => "PoolQC", "pool_qc";
    Fence => "Fence", "fence";
    MiscFeature => "MiscFeature", "misc_feature";
    MoSold => "MoSold", "mo_sold";
    YrSold => "YrSold", "yr_sold";
    KitchenAbvGr => "KitchenAbvGr", "kitchen_abv_gr";
    KitchenQual => "KitchenQual", "kitchen_qual";
    TotRmsAbvGrd => "TotRmsAbvGrd", "tot_rms_abv_grd";
    Functional => "Functional", "functional";
    FireplaceQu => "FireplaceQu", "fireplace_qu";
    GarageType => "GarageType", "garage_type";
    GarageYrBlt => "GarageYrBlt", "garage_yr_blt";
    GarageFinish => "GarageFinish", "garage_finish";
    GarageQual => "GarageQual", "garage_qual";
    GarageCond => "GarageCond", "garage_cond";
    PavedDrive => "PavedDrive", "paved_drive";
    WoodDeckSf => "WoodDeckSF", "wood_deck_sf";
    SaleType => "SaleType", "sale_type";
}

/// Maps a display identifier to the backend's snake_case name.
///
/// Only defined for display-style input: feeding it an already normalized
/// name is not guaranteed to be stable, so call it once, at payload assembly.
pub fn normalize(identifier: &str) -> String {
    if let Some(field) = HouseField::from_display(identifier) {
        return field.wire_name().to_string();
    }
    fallback_snake_case(identifier)
}

/// Generic camelCase/PascalCase -> snake_case rewrite.
pub fn fallback_snake_case(identifier: &str) -> String {
    let split = LOWER_THEN_UPPER.replace_all(identifier, "${1}_${2}");
    let split = ACRONYM_THEN_WORD.replace_all(&split, "${1}_${2}");
    split.to_lowercase()
}

/// Applies [`normalize`] to every key of `object`.
pub fn normalize_keys<'a, I>(object: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    object
        .into_iter()
        .map(|(key, value)| {
            let wire = normalize(key);
            if HouseField::from_display(key).is_none() {
                tracing::debug!("No wire override for {}, using {}", key, wire);
            }
            (wire, value.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_field_uses_its_override() {
        for field in HouseField::ALL {
            assert_eq!(normalize(field.display_name()), field.wire_name());
        }
    }

    #[test]
    fn test_abbreviation_overrides() {
        assert_eq!(normalize("1stFlrSF"), "first_flr_sf");
        assert_eq!(normalize("2ndFlrSF"), "second_flr_sf");
        assert_eq!(normalize("MSSubClass"), "ms_sub_class");
        assert_eq!(normalize("HeatingQC"), "heating_qc");
    }

    #[test]
    fn test_fallback_lower_then_upper() {
        assert_eq!(normalize("lotArea"), "lot_area");
        assert_eq!(normalize("BedroomAbvGr"), "bedroom_abv_gr");
        assert_eq!(normalize("FullBath"), "full_bath");
        assert_eq!(normalize("Condition1"), "condition1");
    }

    #[test]
    fn test_fallback_acronym_then_word() {
        assert_eq!(normalize("ABCDef"), "abc_def");
        assert_eq!(normalize("LowQualFinSF"), "low_qual_fin_sf");
    }

    #[test]
    fn test_fallback_diverges_for_leading_digits() {
        // the generic rule cannot spell digits out, hence the override table
        assert_eq!(fallback_snake_case("3SsnPorch"), "3_ssn_porch");
        assert_eq!(fallback_snake_case("1stFlrSF"), "1st_flr_sf");
        assert_ne!(fallback_snake_case("1stFlrSF"), normalize("1stFlrSF"));
    }

    #[test]
    fn test_normalize_keys() {
        let mut object = Map::new();
        object.insert("GrLivArea".into(), Value::from(1710.0));
        object.insert("2ndFlrSF".into(), Value::from(854.0));
        object.insert("PoolSize".into(), Value::from(0.0));

        let wire = normalize_keys(&object);
        assert_eq!(wire.len(), 3);
        assert_eq!(wire["gr_liv_area"], Value::from(1710.0));
        assert_eq!(wire["second_flr_sf"], Value::from(854.0));
        assert_eq!(wire["pool_size"], Value::from(0.0));
    }
}
