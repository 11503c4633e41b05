//! Async workflows binding the wizard and preference form to the backend
//!
//! Each flow owns its state machine and receives identity through a
//! [`Session`]. A failed network call always leaves the wizard where the
//! user can retry.

use crate::api::{ListingCreator, PredictionClient, RecommendationClient, Recommendations};
use crate::error::FlowError;
use crate::listing::{ListingRecord, PredictedPrice};
use crate::preferences::{PreferenceForm, PreferenceQuery};
use crate::session::Session;
use crate::wizard::{WizardAction, WizardController};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub struct PublishFlow {
    wizard: WizardController,
    session: Session,
    predictor: Arc<dyn PredictionClient>,
    creator: Arc<dyn ListingCreator>,
}

impl PublishFlow {
    pub fn new(
        wizard: WizardController,
        session: Session,
        predictor: Arc<dyn PredictionClient>,
        creator: Arc<dyn ListingCreator>,
    ) -> Self {
        Self {
            wizard,
            session,
            predictor,
            creator,
        }
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut WizardController {
        &mut self.wizard
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn submit(&mut self) -> Result<PredictedPrice, FlowError> {
        self.submit_at(Instant::now()).await
    }

    /// Submits the last section and waits for the price.
    pub async fn submit_at(&mut self, now: Instant) -> Result<PredictedPrice, FlowError> {
        let request = self.wizard.begin_prediction_at(now)?;
        info!("Requesting prediction for {} fields", request.len());

        match self.predictor.predict(&request).await {
            Ok(prediction) => {
                info!(
                    "Predicted {} with {}",
                    prediction.predicted_price, prediction.model_type
                );
                self.wizard
                    .apply_at(WizardAction::PredictionSucceeded(prediction.clone()), now)?;
                Ok(prediction)
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                self.wizard.apply_at(WizardAction::PredictionFailed, now)?;
                Err(e.into())
            }
        }
    }

    /// Publishes the current draft. Rejected locally, with no request sent,
    /// when there is no prediction, no vendor identity or an incomplete draft.
    pub async fn create_listing(&mut self) -> Result<ListingRecord, FlowError> {
        if !self.wizard.has_prediction() {
            return Err(FlowError::NoPrediction);
        }
        let vendor_id = self.session.vendor_id.ok_or(FlowError::MissingIdentity("vendor"))?;
        let payload = self.wizard.begin_listing(vendor_id)?;

        match self
            .creator
            .create_listing(vendor_id, self.session.bearer(), &payload)
            .await
        {
            Ok(record) => {
                info!(
                    "Created listing {:?} for vendor {}",
                    record.house_id, vendor_id
                );
                self.wizard
                    .apply(WizardAction::ListingCreated(record.clone()))?;
                Ok(record)
            }
            Err(e) => {
                warn!("Listing creation failed: {}", e);
                self.wizard.apply(WizardAction::ListingFailed)?;
                Err(e.into())
            }
        }
    }
}

pub struct PreferenceFlow {
    form: PreferenceForm,
    session: Session,
    client: Arc<dyn RecommendationClient>,
}

impl PreferenceFlow {
    pub fn new(form: PreferenceForm, session: Session, client: Arc<dyn RecommendationClient>) -> Self {
        Self {
            form,
            session,
            client,
        }
    }

    pub fn form(&self) -> &PreferenceForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PreferenceForm {
        &mut self.form
    }

    /// Validates and builds the query, then stores it for the signed-in client.
    pub async fn save(&mut self) -> Result<PreferenceQuery, FlowError> {
        let query = self.form.submit()?;
        let client_id = self.session.client_id.ok_or(FlowError::MissingIdentity("client"))?;
        self.client
            .save_preferences(client_id, self.session.bearer(), &query)
            .await?;
        info!("Saved preferences for client {}", client_id);
        Ok(query)
    }

    pub async fn recommendations(&self) -> Result<Recommendations, FlowError> {
        let client_id = self.session.client_id.ok_or(FlowError::MissingIdentity("client"))?;
        let recs = self
            .client
            .recommendations(client_id, self.session.bearer())
            .await?;
        info!(
            "Received {} recommendations for client {}",
            recs.matches.len(),
            client_id
        );
        Ok(recs)
    }
}
