use crate::error::ApiError;
use crate::listing::{CreateListingPayload, ListingRecord, PredictedPrice, PredictionRequest};
use crate::preferences::PreferenceQuery;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recommended house with the vendor that published it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationMatch {
    #[serde(default)]
    pub house: Option<ListingRecord>,
    #[serde(default)]
    pub vendor: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub client: Option<Value>,
    #[serde(default)]
    pub matches: Vec<RecommendationMatch>,
    #[serde(default)]
    pub preferences_applied: Option<Value>,
}

#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictedPrice, ApiError>;
}

#[async_trait]
pub trait ListingCreator: Send + Sync {
    async fn create_listing(
        &self,
        vendor_id: u64,
        token: Option<&str>,
        payload: &CreateListingPayload,
    ) -> Result<ListingRecord, ApiError>;
}

#[async_trait]
pub trait RecommendationClient: Send + Sync {
    async fn save_preferences(
        &self,
        client_id: u64,
        token: Option<&str>,
        query: &PreferenceQuery,
    ) -> Result<(), ApiError>;

    async fn recommendations(&self, client_id: u64, token: Option<&str>) -> Result<Recommendations, ApiError>;
}
