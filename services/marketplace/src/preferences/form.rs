use super::fields::{form_keys, RangePair, RANGE_PAIRS};
use super::query::{build_query, PreferenceQuery};
use super::validate::{first_violation, pair_has_error};
use crate::error::FlowError;
use crate::form::{FieldValue, FormState};

pub const RANGE_ERROR_MESSAGE: &str = "Check the ranges: some fields have Min > Max.";

/// Buyer preference form: raw values plus the last surfaced error.
#[derive(Debug, Clone)]
pub struct PreferenceForm {
    state: FormState,
    error: Option<String>,
}

impl Default for PreferenceForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceForm {
    pub fn new() -> Self {
        Self {
            state: FormState::with_keys(form_keys()),
            error: None,
        }
    }

    pub fn from_state(state: FormState) -> Self {
        let mut form = Self::new();
        for (key, value) in state.iter() {
            form.state.set(key.clone(), value.clone());
        }
        form
    }

    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        if !form_keys().any(|k| k == key) {
            tracing::warn!("Setting undeclared preference key {}", key);
        }
        self.state.set(key, value);
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pairs currently showing min > max, for inline highlighting.
    pub fn invalid_pairs(&self) -> Vec<&'static RangePair> {
        RANGE_PAIRS
            .iter()
            .filter(|pair| pair_has_error(&self.state, pair))
            .collect()
    }

    /// Validates every range, then projects the form. A violation keeps the
    /// form intact and records the generic range message.
    pub fn submit(&mut self) -> Result<PreferenceQuery, FlowError> {
        if let Some(pair) = first_violation(&self.state, RANGE_PAIRS) {
            tracing::info!(
                "Preference submit blocked by {} > {}",
                pair.min_key,
                pair.max_key
            );
            self.error = Some(RANGE_ERROR_MESSAGE.to_string());
            return Err(FlowError::Validation(RANGE_ERROR_MESSAGE.to_string()));
        }
        self.error = None;
        let query = build_query(&self.state);
        tracing::info!(
            "Built preference query with {} active constraints",
            query.active_count()
        );
        Ok(query)
    }

    /// Blanks every field and clears the error.
    pub fn reset(&mut self) {
        self.state.blank_all();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_lot_area_scenario() {
        let mut form = PreferenceForm::new();
        form.set("min_lot_area", "500");
        form.set("max_lot_area", "300");

        let err = form.submit().unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert_eq!(form.error(), Some(RANGE_ERROR_MESSAGE));
        assert_eq!(form.invalid_pairs().len(), 1);
        // form survives the failed submit
        assert_eq!(form.state().value("min_lot_area"), &FieldValue::from("500"));

        form.set("max_lot_area", "5000");
        let query = form.submit().unwrap();
        assert_eq!(form.error(), None);
        assert_eq!(query.get("min_lot_area"), Some(&Value::from(500.0)));
        assert_eq!(query.get("max_lot_area"), Some(&Value::from(5000.0)));
    }

    #[test]
    fn test_total_sf_scenario() {
        let mut form = PreferenceForm::new();
        form.set("totalSF_min_1st", "800");
        form.set("totalSF_min_2nd", "400");
        form.set("totalSF_min_bsmt", "");
        assert!(form.submit().unwrap().is_null("min_total_sf"));

        form.set("totalSF_min_bsmt", "200");
        let query = form.submit().unwrap();
        assert_eq!(query.get("min_total_sf"), Some(&Value::from(1400.0)));
    }

    #[test]
    fn test_reset_blanks_everything() {
        let mut form = PreferenceForm::new();
        form.set("min_sale_price", "300000");
        form.set("max_sale_price", "100000");
        assert!(form.submit().is_err());

        form.reset();
        assert_eq!(form.error(), None);
        assert!(!form.state().is_filled("min_sale_price"));
        assert_eq!(form.submit().unwrap().active_count(), 0);
    }

    #[test]
    fn test_from_state_keeps_declared_keys() {
        let state: FormState = [("min_garage_cars", "2")].into_iter().collect();
        let form = PreferenceForm::from_state(state);
        assert!(form.state().len() > 100);
        assert!(form.state().is_filled("min_garage_cars"));
    }
}
