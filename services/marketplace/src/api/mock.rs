use super::traits::{
    ListingCreator, PredictionClient, RecommendationClient, RecommendationMatch, Recommendations,
};
use crate::error::ApiError;
use crate::listing::{CreateListingPayload, ListingRecord, PredictedPrice, PredictionRequest};
use crate::preferences::PreferenceQuery;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;

const INTERCEPT: f64 = 15_000.0;
const FLOOR_PRICE: f64 = 10_000.0;

/// Coefficients of the in-process price model, by display identifier.
const LINEAR_MODEL: [(&str, f64); 8] = [
    ("OverallQual", 17_500.0),
    ("GrLivArea", 45.0),
    ("TotalSF", 20.0),
    ("TotalBath", 7_500.0),
    ("GarageCars", 9_000.0),
    ("Fireplaces", 4_000.0),
    ("HouseAge", -350.0),
    ("LotArea", 0.8),
];

#[derive(Debug, Clone)]
pub struct CapturedListing {
    pub vendor_id: u64,
    pub token: Option<String>,
    pub payload: CreateListingPayload,
}

/// In-process backend: deterministic prices, scripted failures and a record
/// of every request it served.
pub struct MockApi {
    model_type: String,
    fixed_prediction: Option<PredictedPrice>,
    require_token: bool,
    prediction_failures: AtomicUsize,
    listing_failures: AtomicUsize,
    prediction_calls: AtomicUsize,
    listing_calls: AtomicUsize,
    next_house_id: AtomicU64,
    predictions: Mutex<Vec<PredictionRequest>>,
    listings: Mutex<Vec<CapturedListing>>,
    houses: Mutex<Vec<ListingRecord>>,
    preferences: Mutex<HashMap<u64, PreferenceQuery>>,
}

impl MockApi {
    pub fn new(model_type: impl Into<String>) -> Self {
        Self {
            model_type: model_type.into(),
            fixed_prediction: None,
            require_token: false,
            prediction_failures: AtomicUsize::new(0),
            listing_failures: AtomicUsize::new(0),
            prediction_calls: AtomicUsize::new(0),
            listing_calls: AtomicUsize::new(0),
            next_house_id: AtomicU64::new(1),
            predictions: Mutex::new(Vec::new()),
            listings: Mutex::new(Vec::new()),
            houses: Mutex::new(Vec::new()),
            preferences: Mutex::new(HashMap::new()),
        }
    }

    /// Always answer with `prediction` instead of the linear model.
    pub fn with_fixed_prediction(mut self, prediction: PredictedPrice) -> Self {
        self.fixed_prediction = Some(prediction);
        self
    }

    /// Reject listing and preference calls that carry no bearer token.
    pub fn requiring_token(mut self) -> Self {
        self.require_token = true;
        self
    }

    /// The next `count` prediction calls fail with a 500.
    pub fn failing_predictions(self, count: usize) -> Self {
        self.prediction_failures.store(count, Ordering::Relaxed);
        self
    }

    pub fn failing_listings(self, count: usize) -> Self {
        self.listing_failures.store(count, Ordering::Relaxed);
        self
    }

    pub fn prediction_calls(&self) -> usize {
        self.prediction_calls.load(Ordering::Relaxed)
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::Relaxed)
    }

    pub async fn prediction_requests(&self) -> Vec<PredictionRequest> {
        self.predictions.lock().await.clone()
    }

    pub async fn listing_requests(&self) -> Vec<CapturedListing> {
        self.listings.lock().await.clone()
    }

    pub async fn saved_preferences(&self, client_id: u64) -> Option<PreferenceQuery> {
        self.preferences.lock().await.get(&client_id).cloned()
    }

    fn linear_price(request: &PredictionRequest) -> f64 {
        let price = LINEAR_MODEL
            .iter()
            .fold(INTERCEPT, |acc, (field, weight)| {
                let value = request.get(field).and_then(Value::as_f64).unwrap_or(0.0);
                acc + weight * value
            });
        price.max(FLOOR_PRICE)
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }

    fn check_token(&self, token: Option<&str>) -> Result<(), ApiError> {
        if self.require_token && token.map_or(true, str::is_empty) {
            return Err(ApiError::status(401, r#"{"error": "missing bearer token"}"#));
        }
        Ok(())
    }
}

#[async_trait]
impl PredictionClient for MockApi {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictedPrice, ApiError> {
        self.prediction_calls.fetch_add(1, Ordering::Relaxed);
        self.predictions.lock().await.push(request.clone());

        if Self::take_failure(&self.prediction_failures) {
            return Err(ApiError::status(500, r#"{"error": "mock prediction failure"}"#));
        }
        Ok(self.fixed_prediction.clone().unwrap_or_else(|| PredictedPrice {
            predicted_price: Self::linear_price(request),
            model_type: self.model_type.clone(),
        }))
    }
}

#[async_trait]
impl ListingCreator for MockApi {
    async fn create_listing(
        &self,
        vendor_id: u64,
        token: Option<&str>,
        payload: &CreateListingPayload,
    ) -> Result<ListingRecord, ApiError> {
        self.listing_calls.fetch_add(1, Ordering::Relaxed);
        self.listings.lock().await.push(CapturedListing {
            vendor_id,
            token: token.map(str::to_string),
            payload: payload.clone(),
        });
        self.check_token(token)?;

        if Self::take_failure(&self.listing_failures) {
            return Err(ApiError::status(500, r#"{"error": "mock listing failure"}"#));
        }

        let mut record = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
        let house_id = self.next_house_id.fetch_add(1, Ordering::Relaxed);
        record["house_id"] = Value::from(house_id);
        let record: ListingRecord =
            serde_json::from_value(record).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.houses.lock().await.push(record.clone());
        Ok(record)
    }
}

fn within(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    match value {
        Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
        None => min.is_none() && max.is_none(),
    }
}

#[async_trait]
impl RecommendationClient for MockApi {
    async fn save_preferences(
        &self,
        client_id: u64,
        token: Option<&str>,
        query: &PreferenceQuery,
    ) -> Result<(), ApiError> {
        self.check_token(token)?;
        self.preferences.lock().await.insert(client_id, query.clone());
        Ok(())
    }

    async fn recommendations(&self, client_id: u64, token: Option<&str>) -> Result<Recommendations, ApiError> {
        self.check_token(token)?;
        let query = match self.preferences.lock().await.get(&client_id).cloned() {
            Some(query) => query,
            None => {
                return Err(ApiError::status(
                    404,
                    r#"{"error": "client has no saved preferences"}"#,
                ))
            }
        };

        let min = query.get("min_sale_price").and_then(Value::as_f64);
        let max = query.get("max_sale_price").and_then(Value::as_f64);
        let matches = self
            .houses
            .lock()
            .await
            .iter()
            .filter(|house| within(house.sale_price, min, max))
            .map(|house| RecommendationMatch {
                house: Some(house.clone()),
                vendor: house.vendor_id.map(|id| json!({ "vendor_id": id })),
            })
            .collect();

        Ok(Recommendations {
            client: Some(json!({ "client_id": client_id })),
            matches,
            preferences_applied: serde_json::to_value(&query).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DatasetCatalog;
    use crate::form::FormState;
    use crate::listing::ListingDraft;
    use crate::preferences::PreferenceForm;

    fn request(qual: f64, area: f64) -> PredictionRequest {
        let mut form = FormState::new();
        form.set("OverallQual", qual);
        form.set("GrLivArea", area);
        let catalog = DatasetCatalog::from_json(r#"{"numeric_means": {}, "categorical_uniques": {}}"#).unwrap();
        PredictionRequest::build(&["OverallQual", "GrLivArea"], &form, &catalog)
    }

    fn payload(sale_price: f64) -> CreateListingPayload {
        let mut draft = ListingDraft::default();
        draft.title = "Casa".into();
        draft.contact_phone = "555".into();
        draft.contact_email = "a@b.c".into();
        let prediction = PredictedPrice {
            predicted_price: sale_price,
            model_type: "mock-linear".into(),
        };
        draft.seed_sale_price(sale_price);
        CreateListingPayload::assemble(&request(7.0, 1710.0), &draft, &prediction, 7).unwrap()
    }

    #[tokio::test]
    async fn test_linear_model_is_deterministic() {
        let api = MockApi::new("mock-linear");
        let low = api.predict(&request(5.0, 1000.0)).await.unwrap();
        let high = api.predict(&request(8.0, 2000.0)).await.unwrap();
        assert_eq!(low.predicted_price, 15_000.0 + 5.0 * 17_500.0 + 1000.0 * 45.0);
        assert!(high.predicted_price > low.predicted_price);
        assert_eq!(high.model_type, "mock-linear");
        assert_eq!(api.prediction_calls(), 2);
        assert_eq!(api.prediction_requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_scripted_failures_run_out() {
        let api = MockApi::new("mock-linear").failing_predictions(1);
        assert!(matches!(
            api.predict(&request(5.0, 1000.0)).await,
            Err(ApiError::Status { status: 500, .. })
        ));
        assert!(api.predict(&request(5.0, 1000.0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_listing_echoes_record() {
        let api = MockApi::new("mock-linear");
        let record = api.create_listing(7, Some("tok"), &payload(250000.5)).await.unwrap();
        assert_eq!(record.house_id, Some(1));
        assert_eq!(record.vendor_id, Some(7));
        assert_eq!(record.status.as_deref(), Some("available"));
        assert_eq!(record.extra["overall_qual"], Value::from(7.0));

        let captured = api.listing_requests().await;
        assert_eq!(captured[0].token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_token_required() {
        let api = MockApi::new("mock-linear").requiring_token();
        let err = api.create_listing(7, None, &payload(1.0)).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        assert_eq!(api.listing_calls(), 1);
    }

    #[tokio::test]
    async fn test_recommendations_filter_by_price() {
        let api = MockApi::new("mock-linear");
        api.create_listing(7, None, &payload(150000.0)).await.unwrap();
        api.create_listing(7, None, &payload(400000.0)).await.unwrap();

        assert!(api.recommendations(3, None).await.is_err());

        let mut form = PreferenceForm::new();
        form.set("max_sale_price", "200000");
        let query = form.submit().unwrap();
        api.save_preferences(3, None, &query).await.unwrap();

        let recs = api.recommendations(3, None).await.unwrap();
        assert_eq!(recs.matches.len(), 1);
        assert_eq!(
            recs.matches[0].house.as_ref().and_then(|h| h.sale_price),
            Some(150000.0)
        );
        assert!(recs.preferences_applied.is_some());
    }
}
