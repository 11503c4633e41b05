use super::prediction::{PredictedPrice, PredictionRequest};
use crate::error::FlowError;
use crate::keys::normalize_keys;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys set by the draft itself; normalized form attributes never override them.
const RESERVED_KEYS: [&str; 9] = [
    "title",
    "sale_price",
    "contact_phone",
    "contact_email",
    "predicted_price",
    "model_type",
    "vendor_id",
    "status",
    "house_id",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    ContactPhone,
    ContactEmail,
}

/// Listing metadata typed by the seller. The sale price is read-only and
/// seeded from the prediction, unrounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    sale_price: f64,
    pub contact_phone: String,
    pub contact_email: String,
}

impl ListingDraft {
    pub fn sale_price(&self) -> f64 {
        self.sale_price
    }

    pub(crate) fn seed_sale_price(&mut self, price: f64) {
        self.sale_price = price;
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Title => self.title = value,
            DraftField::ContactPhone => self.contact_phone = value,
            DraftField::ContactEmail => self.contact_email = value,
        }
    }

    /// Every user-entered field is required.
    pub fn validate(&self) -> Result<(), FlowError> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("contact_phone", &self.contact_phone),
            ("contact_email", &self.contact_email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FlowError::Validation(format!(
                "missing listing details: {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Available,
}

/// Body of the create-listing call: snake_cased prediction inputs plus the
/// draft, the prediction and the vendor identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateListingPayload {
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    pub title: String,
    pub sale_price: f64,
    pub contact_phone: String,
    pub contact_email: String,
    pub predicted_price: f64,
    pub model_type: String,
    pub vendor_id: u64,
    pub status: ListingStatus,
}

impl CreateListingPayload {
    /// Builds the whole payload or nothing.
    pub fn assemble(
        request: &PredictionRequest,
        draft: &ListingDraft,
        prediction: &PredictedPrice,
        vendor_id: u64,
    ) -> Result<Self, FlowError> {
        draft.validate()?;

        let mut attributes = normalize_keys(request.as_map());
        for key in RESERVED_KEYS {
            if attributes.remove(key).is_some() {
                tracing::warn!("Dropping form attribute {} that collides with listing metadata", key);
            }
        }
        tracing::debug!(
            "Assembled listing payload with {} attributes for vendor {}",
            attributes.len(),
            vendor_id
        );

        Ok(Self {
            attributes,
            title: draft.title.trim().to_string(),
            sale_price: draft.sale_price(),
            contact_phone: draft.contact_phone.trim().to_string(),
            contact_email: draft.contact_email.trim().to_string(),
            predicted_price: prediction.predicted_price,
            model_type: prediction.model_type.clone(),
            vendor_id,
            status: ListingStatus::Available,
        })
    }
}

/// Listing as echoed back by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(default)]
    pub house_id: Option<u64>,
    #[serde(default)]
    pub vendor_id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DatasetCatalog;
    use crate::form::FormState;

    fn request() -> PredictionRequest {
        let mut form = FormState::new();
        form.set("GrLivArea", 1710.0);
        form.set("1stFlrSF", 856.0);
        form.set("Neighborhood", "CollgCr");
        let catalog = DatasetCatalog::from_json(
            r#"{"numeric_means": {"GrLivArea": 1500.0, "1stFlrSF": 1100.0},
                "categorical_uniques": {"Neighborhood": ["CollgCr"]}}"#,
        )
        .unwrap();
        PredictionRequest::build(&["GrLivArea", "1stFlrSF", "Neighborhood"], &form, &catalog)
    }

    fn draft() -> ListingDraft {
        let mut draft = ListingDraft::default();
        draft.set(DraftField::Title, "Casa en CollgCr");
        draft.set(DraftField::ContactPhone, "555-0123");
        draft.set(DraftField::ContactEmail, "vendor@example.com");
        draft.seed_sale_price(250000.5);
        draft
    }

    fn prediction() -> PredictedPrice {
        PredictedPrice {
            predicted_price: 250000.5,
            model_type: "gbr".into(),
        }
    }

    #[test]
    fn test_assemble_payload() {
        let payload = CreateListingPayload::assemble(&request(), &draft(), &prediction(), 7).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["gr_liv_area"], Value::from(1710.0));
        assert_eq!(json["first_flr_sf"], Value::from(856.0));
        assert_eq!(json["neighborhood"], Value::from("CollgCr"));
        assert!(json.get("GrLivArea").is_none());
        assert_eq!(json["title"], Value::from("Casa en CollgCr"));
        assert_eq!(json["sale_price"], Value::from(250000.5));
        assert_eq!(json["predicted_price"], Value::from(250000.5));
        assert_eq!(json["model_type"], Value::from("gbr"));
        assert_eq!(json["vendor_id"], Value::from(7));
        assert_eq!(json["status"], Value::from("available"));
    }

    #[test]
    fn test_missing_details_block_assembly() {
        let mut incomplete = draft();
        incomplete.set(DraftField::ContactEmail, "  ");
        incomplete.set(DraftField::Title, "");
        let err = CreateListingPayload::assemble(&request(), &incomplete, &prediction(), 7)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing listing details: title, contact_email"
        );
    }

    #[test]
    fn test_record_keeps_unknown_fields() {
        let record: ListingRecord = serde_json::from_str(
            r#"{"house_id": 42, "vendor_id": 7, "title": "Casa", "sale_price": 250000.5,
                "status": "available", "neighborhood": "CollgCr"}"#,
        )
        .unwrap();
        assert_eq!(record.house_id, Some(42));
        assert_eq!(record.extra["neighborhood"], Value::from("CollgCr"));
    }
}
