//! Declared buyer-preference fields and their min/max pairs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKind {
    Float,
    Integer,
    Categorical,
    /// Tri-state yes/no/any select.
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceField {
    pub key: &'static str,
    pub kind: PreferenceKind,
}

const fn float(key: &'static str) -> PreferenceField {
    PreferenceField { key, kind: PreferenceKind::Float }
}

const fn int(key: &'static str) -> PreferenceField {
    PreferenceField { key, kind: PreferenceKind::Integer }
}

const fn cat(key: &'static str) -> PreferenceField {
    PreferenceField { key, kind: PreferenceKind::Categorical }
}

/// Every field emitted in a preference query (derived totals excluded).
pub const PREFERENCE_FIELDS: &[PreferenceField] = &[
    // location and zoning
    cat("preferred_neighborhood"),
    cat("preferred_ms_zoning"),
    cat("preferred_lot_shape"),
    cat("preferred_land_contour"),
    cat("preferred_lot_config"),
    cat("preferred_condition1"),
    // house type
    cat("preferred_bldg_type"),
    cat("preferred_house_style"),
    cat("preferred_roof_style"),
    cat("preferred_exterior1st"),
    cat("preferred_exterior2nd"),
    cat("preferred_foundation"),
    // quality and condition
    float("min_overall_qual"),
    float("max_overall_qual"),
    float("min_overall_cond"),
    float("max_overall_cond"),
    cat("min_exter_qual"),
    cat("min_exter_cond"),
    // years
    int("min_year_built"),
    int("max_year_built"),
    int("min_year_remod_add"),
    int("max_year_remod_add"),
    float("min_house_age"),
    float("max_house_age"),
    float("min_remod_age"),
    float("max_remod_age"),
    // sizes
    float("min_lot_area"),
    float("max_lot_area"),
    float("min_lot_frontage"),
    float("max_lot_frontage"),
    float("min_gr_liv_area"),
    float("max_gr_liv_area"),
    float("min_total_bsmt_sf"),
    float("max_total_bsmt_sf"),
    // rooms and baths
    int("min_bedroom_abv_gr"),
    int("max_bedroom_abv_gr"),
    int("min_kitchen_abv_gr"),
    int("max_kitchen_abv_gr"),
    int("min_tot_rms_abv_grd"),
    int("max_tot_rms_abv_grd"),
    int("min_full_bath"),
    int("max_full_bath"),
    int("min_half_bath"),
    int("max_half_bath"),
    int("min_bsmt_full_bath"),
    int("max_bsmt_full_bath"),
    int("min_bsmt_half_bath"),
    int("max_bsmt_half_bath"),
    float("min_total_bath"),
    float("max_total_bath"),
    float("min_rooms_plus_bath_eq"),
    float("max_rooms_plus_bath_eq"),
    // basement
    cat("preferred_bsmt_qual"),
    cat("preferred_bsmt_cond"),
    cat("preferred_bsmt_exposure"),
    cat("preferred_bsmt_fin_type1"),
    cat("preferred_bsmt_fin_type2"),
    float("min_bsmt_fin_sf1"),
    float("max_bsmt_fin_sf1"),
    float("min_bsmt_fin_sf2"),
    float("max_bsmt_fin_sf2"),
    float("min_bsmt_unf_sf"),
    float("max_bsmt_unf_sf"),
    // heating and air
    cat("preferred_heating_qc"),
    PreferenceField { key: "central_air_required", kind: PreferenceKind::Flag },
    cat("preferred_electrical"),
    // kitchen and function
    cat("min_kitchen_qual"),
    cat("preferred_functional"),
    // fireplaces
    int("min_fireplaces"),
    int("max_fireplaces"),
    cat("preferred_fireplace_qu"),
    // garage
    cat("preferred_garage_type"),
    int("min_garage_yr_blt"),
    int("max_garage_yr_blt"),
    cat("preferred_garage_finish"),
    int("min_garage_cars"),
    int("max_garage_cars"),
    float("min_garage_area"),
    float("max_garage_area"),
    cat("preferred_garage_qual"),
    cat("preferred_garage_cond"),
    cat("preferred_paved_drive"),
    float("min_garage_score"),
    float("max_garage_score"),
    // porches
    float("min_wood_deck_sf"),
    float("max_wood_deck_sf"),
    float("min_open_porch_sf"),
    float("max_open_porch_sf"),
    float("min_enclosed_porch"),
    float("max_enclosed_porch"),
    float("min_3ssn_porch"),
    float("max_3ssn_porch"),
    float("min_screen_porch"),
    float("max_screen_porch"),
    float("min_total_porch_sf"),
    float("max_total_porch_sf"),
    // pool
    float("min_pool_area"),
    float("max_pool_area"),
    cat("preferred_pool_qc"),
    // fences and misc
    cat("preferred_fence"),
    cat("preferred_misc_feature"),
    // price
    float("min_sale_price"),
    float("max_sale_price"),
    // sale
    cat("preferred_sale_type"),
    cat("preferred_sale_condition"),
];

/// First-floor, second-floor and basement inputs summed into `min_total_sf`.
pub const TOTAL_SF_MIN_COMPONENTS: [&str; 3] =
    ["totalSF_min_1st", "totalSF_min_2nd", "totalSF_min_bsmt"];

/// First-floor, second-floor and basement inputs summed into `max_total_sf`.
pub const TOTAL_SF_MAX_COMPONENTS: [&str; 3] =
    ["totalSF_max_1st", "totalSF_max_2nd", "totalSF_max_bsmt"];

pub const MIN_TOTAL_SF: &str = "min_total_sf";
pub const MAX_TOTAL_SF: &str = "max_total_sf";

/// A named (min, max) constraint over the preference form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePair {
    pub min_key: &'static str,
    pub max_key: &'static str,
}

const fn pair(min_key: &'static str, max_key: &'static str) -> RangePair {
    RangePair { min_key, max_key }
}

pub const RANGE_PAIRS: &[RangePair] = &[
    pair("min_overall_qual", "max_overall_qual"),
    pair("min_overall_cond", "max_overall_cond"),
    pair("min_year_built", "max_year_built"),
    pair("min_year_remod_add", "max_year_remod_add"),
    pair("min_house_age", "max_house_age"),
    pair("min_remod_age", "max_remod_age"),
    pair("min_lot_area", "max_lot_area"),
    pair("min_lot_frontage", "max_lot_frontage"),
    pair("min_gr_liv_area", "max_gr_liv_area"),
    pair("min_total_bsmt_sf", "max_total_bsmt_sf"),
    pair("min_bedroom_abv_gr", "max_bedroom_abv_gr"),
    pair("min_kitchen_abv_gr", "max_kitchen_abv_gr"),
    pair("min_tot_rms_abv_grd", "max_tot_rms_abv_grd"),
    pair("min_full_bath", "max_full_bath"),
    pair("min_half_bath", "max_half_bath"),
    pair("min_bsmt_full_bath", "max_bsmt_full_bath"),
    pair("min_bsmt_half_bath", "max_bsmt_half_bath"),
    pair("min_total_bath", "max_total_bath"),
    pair("min_rooms_plus_bath_eq", "max_rooms_plus_bath_eq"),
    pair("min_bsmt_fin_sf1", "max_bsmt_fin_sf1"),
    pair("min_bsmt_fin_sf2", "max_bsmt_fin_sf2"),
    pair("min_bsmt_unf_sf", "max_bsmt_unf_sf"),
    pair("min_fireplaces", "max_fireplaces"),
    pair("min_garage_yr_blt", "max_garage_yr_blt"),
    pair("min_garage_cars", "max_garage_cars"),
    pair("min_garage_area", "max_garage_area"),
    pair("min_garage_score", "max_garage_score"),
    pair("min_wood_deck_sf", "max_wood_deck_sf"),
    pair("min_open_porch_sf", "max_open_porch_sf"),
    pair("min_enclosed_porch", "max_enclosed_porch"),
    pair("min_3ssn_porch", "max_3ssn_porch"),
    pair("min_screen_porch", "max_screen_porch"),
    pair("min_total_porch_sf", "max_total_porch_sf"),
    pair("min_pool_area", "max_pool_area"),
    pair("min_sale_price", "max_sale_price"),
    // total square footage components
    pair("totalSF_min_1st", "totalSF_max_1st"),
    pair("totalSF_min_2nd", "totalSF_max_2nd"),
    pair("totalSF_min_bsmt", "totalSF_max_bsmt"),
];

pub fn field(key: &str) -> Option<&'static PreferenceField> {
    PREFERENCE_FIELDS.iter().find(|f| f.key == key)
}

/// Every key the preference form holds, including the total-SF components.
pub fn form_keys() -> impl Iterator<Item = &'static str> {
    PREFERENCE_FIELDS
        .iter()
        .map(|f| f.key)
        .chain(TOTAL_SF_MIN_COMPONENTS)
        .chain(TOTAL_SF_MAX_COMPONENTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: Vec<_> = form_keys().collect();
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(keys.len(), unique.len());
    }

    #[test]
    fn test_every_pair_refers_to_form_keys() {
        let keys: HashSet<_> = form_keys().collect();
        for p in RANGE_PAIRS {
            assert!(keys.contains(p.min_key), "{}", p.min_key);
            assert!(keys.contains(p.max_key), "{}", p.max_key);
        }
    }

    #[test]
    fn test_paired_fields_are_numeric() {
        for p in RANGE_PAIRS {
            for key in [p.min_key, p.max_key] {
                if let Some(f) = field(key) {
                    assert!(
                        matches!(f.kind, PreferenceKind::Float | PreferenceKind::Integer),
                        "{} is not numeric",
                        key
                    );
                }
            }
        }
    }
}
