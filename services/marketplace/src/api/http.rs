use super::traits::{ListingCreator, PredictionClient, RecommendationClient, Recommendations};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::listing::{CreateListingPayload, ListingRecord, PredictedPrice, PredictionRequest};
use crate::preferences::PreferenceQuery;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

/// Marketplace backend over HTTP/JSON.
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        // Trailing slash so relative joins keep any path prefix.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send_raw(&self, request: RequestBuilder, token: Option<&str>) -> Result<String, ApiError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Backend returned {}: {}", status, body);
            return Err(ApiError::status(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, token: Option<&str>) -> Result<T, ApiError> {
        let body = self.send_raw(request, token).await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            ApiError::Decode(format!("{} in {}", e, preview))
        })
    }
}

#[async_trait]
impl PredictionClient for HttpApi {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictedPrice, ApiError> {
        let url = self.endpoint("api/ai/predict/simple")?;
        info!("POST {} ({} fields)", url, request.len());
        let prediction: PredictedPrice = self.send(self.client.post(url).json(request), None).await?;
        debug!("Prediction {} from {}", prediction.predicted_price, prediction.model_type);
        Ok(prediction)
    }
}

#[async_trait]
impl ListingCreator for HttpApi {
    async fn create_listing(
        &self,
        vendor_id: u64,
        token: Option<&str>,
        payload: &CreateListingPayload,
    ) -> Result<ListingRecord, ApiError> {
        let url = self.endpoint(&format!("api/vendors/{}/houses", vendor_id))?;
        info!("POST {} ({})", url, payload.title);
        self.send(self.client.post(url).json(payload), token).await
    }
}

#[async_trait]
impl RecommendationClient for HttpApi {
    async fn save_preferences(
        &self,
        client_id: u64,
        token: Option<&str>,
        query: &PreferenceQuery,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/clients/{}/preferences", client_id))?;
        info!("POST {} ({} active constraints)", url, query.active_count());
        self.send_raw(self.client.post(url).json(query), token).await?;
        Ok(())
    }

    async fn recommendations(&self, client_id: u64, token: Option<&str>) -> Result<Recommendations, ApiError> {
        let url = self.endpoint(&format!("api/clients/{}/recommendations", client_id))?;
        info!("GET {}", url);
        self.send(self.client.get(url), token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> HttpApi {
        HttpApi::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_join() {
        let api = api("http://127.0.0.1:5001");
        assert_eq!(
            api.endpoint("/api/ai/predict/simple").unwrap().as_str(),
            "http://127.0.0.1:5001/api/ai/predict/simple"
        );
        assert_eq!(
            api.endpoint("api/vendors/7/houses").unwrap().as_str(),
            "http://127.0.0.1:5001/api/vendors/7/houses"
        );
    }

    #[test]
    fn test_endpoint_keeps_prefix() {
        let api = api("https://example.com/backend");
        assert_eq!(
            api.endpoint("api/clients/3/recommendations").unwrap().as_str(),
            "https://example.com/backend/api/clients/3/recommendations"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpApi::new(&ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        })
        .err()
        .unwrap();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let api = api("http://127.0.0.1:9");
        let err = api.recommendations(1, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
