use super::section::{FormMode, Section};
use super::state::{transition, Guards, WizardAction, WizardPhase};
use crate::catalog::DatasetCatalog;
use crate::config::WizardConfig;
use crate::error::{FlowError, WizardError};
use crate::form::{FieldValue, FormState};
use crate::listing::{
    CreateListingPayload, DraftField, ListingDraft, ListingRecord, PredictedPrice,
    PredictionRequest,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Drives the publish wizard: section navigation, field edits, the submit
/// debounce and the state carried from prediction to listing creation.
pub struct WizardController {
    catalog: Arc<DatasetCatalog>,
    cooldown: Duration,
    full_section_size: usize,
    phase: WizardPhase,
    mode: Option<FormMode>,
    sections: Vec<Section>,
    form: FormState,
    /// When the last section was entered by navigation.
    last_section_entered_at: Option<Instant>,
    last_payload: Option<PredictionRequest>,
    prediction: Option<PredictedPrice>,
    draft: ListingDraft,
    last_record: Option<ListingRecord>,
}

impl WizardController {
    pub fn new(catalog: Arc<DatasetCatalog>, config: &WizardConfig) -> Self {
        Self {
            catalog,
            cooldown: config.submit_cooldown(),
            full_section_size: config.full_section_size,
            phase: WizardPhase::SelectingMode,
            mode: None,
            sections: Vec::new(),
            form: FormState::new(),
            last_section_entered_at: None,
            last_payload: None,
            prediction: None,
            draft: ListingDraft::default(),
            last_record: None,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.mode
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            WizardPhase::EditingSection(i) => Some(i),
            _ => None,
        }
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.current_index().and_then(|i| self.sections.get(i))
    }

    pub fn is_last_section(&self) -> bool {
        self.current_index()
            .map_or(false, |i| i + 1 == self.sections.len())
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn prediction(&self) -> Option<&PredictedPrice> {
        self.prediction.as_ref()
    }

    pub fn last_payload(&self) -> Option<&PredictionRequest> {
        self.last_payload.as_ref()
    }

    pub fn last_record(&self) -> Option<&ListingRecord> {
        self.last_record.as_ref()
    }

    /// A listing may only be created once a submitted payload produced a price.
    pub fn has_prediction(&self) -> bool {
        self.last_payload.is_some() && self.prediction.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Share of declared fields holding a value, in [0, 1].
    pub fn progress(&self) -> f64 {
        let total = self.fields().count();
        if total == 0 {
            return 0.0;
        }
        let filled = self.fields().filter(|f| self.form.is_filled(f)).count();
        filled as f64 / total as f64
    }

    pub fn submit_armed(&self) -> bool {
        self.submit_armed_at(Instant::now())
    }

    pub fn submit_armed_at(&self, now: Instant) -> bool {
        self.is_last_section()
            && self
                .last_section_entered_at
                .map_or(true, |t| now.saturating_duration_since(t) >= self.cooldown)
    }

    /// Time left before submit arms, zero once armed.
    pub fn cooldown_remaining_at(&self, now: Instant) -> Duration {
        self.last_section_entered_at
            .map_or(Duration::ZERO, |t| {
                self.cooldown.saturating_sub(now.saturating_duration_since(t))
            })
    }

    fn editing_guard(&self, action: &str) -> Result<(), WizardError> {
        match self.phase {
            WizardPhase::EditingSection(_) => Ok(()),
            phase => Err(WizardError::InvalidTransition {
                phase: phase.to_string(),
                action: action.to_string(),
            }),
        }
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<(), WizardError> {
        self.editing_guard("edit a field")?;
        if !self.fields().any(|f| f == field) {
            return Err(WizardError::UnknownField(field.to_string()));
        }
        self.form.set(field, value);
        Ok(())
    }

    /// Fills every field of every section: catalog demo record, then the
    /// dataset mean, then a random option. Categoricals with no options are
    /// left empty. Returns how many fields were given a value.
    pub fn demo_fill_with(&mut self, rng: &mut fastrand::Rng) -> Result<usize, WizardError> {
        self.editing_guard("autofill demo values")?;
        let fields: Vec<String> = self.fields().cloned().collect();

        let mut filled = 0;
        for field in &fields {
            let value = self
                .catalog
                .demo_value(field)
                .or_else(|| self.catalog.numeric_mean(field).map(FieldValue::Number))
                .or_else(|| {
                    self.catalog
                        .options(field)
                        .filter(|opts| !opts.is_empty())
                        .map(|opts| FieldValue::Text(opts[rng.usize(..opts.len())].clone()))
                });
            let value = match value {
                Some(value) => value,
                None if self.catalog.field_spec(field).is_numeric() => FieldValue::Number(0.0),
                None => FieldValue::Empty,
            };
            if !value.is_empty() {
                filled += 1;
            }
            self.form.set(field.as_str(), value);
        }
        debug!("Demo filled {} of {} fields", filled, fields.len());
        Ok(filled)
    }

    pub fn demo_fill(&mut self) -> Result<usize, WizardError> {
        self.demo_fill_with(&mut fastrand::Rng::new())
    }

    pub fn set_draft_field(&mut self, field: DraftField, value: impl Into<String>) -> Result<(), WizardError> {
        if self.phase != WizardPhase::PredictionReady {
            return Err(WizardError::InvalidTransition {
                phase: self.phase.to_string(),
                action: "edit listing details".to_string(),
            });
        }
        self.draft.set(field, value);
        Ok(())
    }

    pub fn apply(&mut self, action: WizardAction) -> Result<WizardPhase, WizardError> {
        self.apply_at(action, Instant::now())
    }

    pub fn apply_at(&mut self, action: WizardAction, now: Instant) -> Result<WizardPhase, WizardError> {
        let pending_sections = match &action {
            WizardAction::SelectMode(mode) => Some(mode.sections(&self.catalog, self.full_section_size)),
            _ => None,
        };
        let guards = Guards {
            section_count: pending_sections
                .as_ref()
                .map_or(self.sections.len(), |s| s.len()),
            submit_armed: self.submit_armed_at(now),
        };
        let next = transition(&self.phase, &action, guards)?;
        let previous = self.phase;

        match action {
            WizardAction::SelectMode(mode) => {
                self.mode = Some(mode);
                self.sections = pending_sections.unwrap_or_default();
            }
            WizardAction::Submit => {
                let fields: Vec<&String> = self.fields().collect();
                let request = PredictionRequest::build(&fields, &self.form, &self.catalog);
                debug!("Built prediction request with {} fields", request.len());
                self.last_payload = Some(request);
                self.prediction = None;
            }
            WizardAction::PredictionSucceeded(prediction) => {
                self.draft.seed_sale_price(prediction.predicted_price);
                self.prediction = Some(prediction);
            }
            WizardAction::ListingCreated(record) => {
                self.last_record = Some(record);
            }
            WizardAction::Restart => {
                self.mode = None;
                self.sections.clear();
                self.form = FormState::new();
                self.last_section_entered_at = None;
                self.last_payload = None;
                self.prediction = None;
                self.draft = ListingDraft::default();
                self.last_record = None;
            }
            WizardAction::Next
            | WizardAction::Previous
            | WizardAction::Revise
            | WizardAction::PredictionFailed
            | WizardAction::CreateListing
            | WizardAction::ListingFailed => {}
        }

        self.phase = next;

        // Arriving at the last section by navigation starts the submit debounce.
        let last = self.sections.len().checked_sub(1);
        let entered_last = matches!(next, WizardPhase::EditingSection(i) if Some(i) == last)
            && previous != next
            && previous != WizardPhase::AwaitingPrediction;
        if entered_last {
            self.last_section_entered_at = Some(now);
        }

        info!("Wizard {} -> {}", previous, next);
        Ok(next)
    }

    /// Enters `AwaitingPrediction` and hands back the request to send.
    pub fn begin_prediction_at(&mut self, now: Instant) -> Result<PredictionRequest, WizardError> {
        self.apply_at(WizardAction::Submit, now)?;
        // Submit always stores the payload it built.
        self.last_payload
            .clone()
            .ok_or_else(|| WizardError::InvalidTransition {
                phase: self.phase.to_string(),
                action: WizardAction::Submit.name().to_string(),
            })
    }

    /// Assembles the creation payload and enters `CreatingListing`. Nothing
    /// changes if the draft is incomplete.
    pub fn begin_listing(&mut self, vendor_id: u64) -> Result<CreateListingPayload, FlowError> {
        let (request, prediction) = match (&self.last_payload, &self.prediction) {
            (Some(request), Some(prediction)) => (request, prediction),
            _ => return Err(FlowError::NoPrediction),
        };
        let payload = CreateListingPayload::assemble(request, &self.draft, prediction, vendor_id)?;
        self.apply(WizardAction::CreateListing)?;
        Ok(payload)
    }
}
