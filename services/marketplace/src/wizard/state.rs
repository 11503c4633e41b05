//! Wizard phases and the pure transition function over them

use super::section::FormMode;
use crate::error::WizardError;
use crate::listing::{ListingRecord, PredictedPrice};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    SelectingMode,
    EditingSection(usize),
    AwaitingPrediction,
    PredictionReady,
    CreatingListing,
    Completed,
}

impl WizardPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, WizardPhase::AwaitingPrediction | WizardPhase::CreatingListing)
    }
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardPhase::SelectingMode => write!(f, "selecting a form mode"),
            WizardPhase::EditingSection(i) => write!(f, "editing section {}", i + 1),
            WizardPhase::AwaitingPrediction => write!(f, "awaiting a prediction"),
            WizardPhase::PredictionReady => write!(f, "holding a prediction"),
            WizardPhase::CreatingListing => write!(f, "creating the listing"),
            WizardPhase::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    SelectMode(FormMode),
    Next,
    Previous,
    Submit,
    PredictionSucceeded(PredictedPrice),
    PredictionFailed,
    CreateListing,
    ListingCreated(ListingRecord),
    ListingFailed,
    Revise,
    Restart,
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            WizardAction::SelectMode(_) => "select a mode",
            WizardAction::Next => "go to the next section",
            WizardAction::Previous => "go to the previous section",
            WizardAction::Submit => "submit",
            WizardAction::PredictionSucceeded(_) => "accept a prediction",
            WizardAction::PredictionFailed => "report a failed prediction",
            WizardAction::CreateListing => "create a listing",
            WizardAction::ListingCreated(_) => "accept a created listing",
            WizardAction::ListingFailed => "report a failed listing",
            WizardAction::Revise => "revise the form",
            WizardAction::Restart => "restart",
        }
    }
}

/// Facts the transition needs that live outside the phase itself.
#[derive(Debug, Clone, Copy)]
pub struct Guards {
    /// Sections in the active form (or in the mode being selected).
    pub section_count: usize,
    pub submit_armed: bool,
}

fn invalid(phase: &WizardPhase, action: &WizardAction) -> WizardError {
    WizardError::InvalidTransition {
        phase: phase.to_string(),
        action: action.name().to_string(),
    }
}

pub fn transition(
    phase: &WizardPhase,
    action: &WizardAction,
    guards: Guards,
) -> Result<WizardPhase, WizardError> {
    use WizardAction as A;
    use WizardPhase as P;

    let last = guards.section_count.saturating_sub(1);

    match (phase, action) {
        (P::AwaitingPrediction | P::CreatingListing, A::Submit | A::CreateListing | A::Restart) => {
            Err(WizardError::Busy)
        }

        (P::SelectingMode, A::SelectMode(_)) if guards.section_count > 0 => Ok(P::EditingSection(0)),

        (P::EditingSection(i), A::Next) => Ok(P::EditingSection((i + 1).min(last))),
        (P::EditingSection(i), A::Previous) => Ok(P::EditingSection(i.saturating_sub(1).min(last))),
        (P::EditingSection(i), A::Submit) if *i == last => {
            if guards.submit_armed {
                Ok(P::AwaitingPrediction)
            } else {
                Err(WizardError::SubmitCoolingDown)
            }
        }

        (P::AwaitingPrediction, A::PredictionSucceeded(_)) => Ok(P::PredictionReady),
        (P::AwaitingPrediction, A::PredictionFailed) => Ok(P::EditingSection(last)),

        (P::PredictionReady, A::CreateListing) => Ok(P::CreatingListing),
        (P::PredictionReady, A::Revise) => Ok(P::EditingSection(last)),

        (P::CreatingListing, A::ListingCreated(_)) => Ok(P::Completed),
        (P::CreatingListing, A::ListingFailed) => Ok(P::PredictionReady),

        (_, A::Restart) => Ok(P::SelectingMode),

        _ => Err(invalid(phase, action)),
    }
}
