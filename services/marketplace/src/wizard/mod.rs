//! Publish wizard
//!
//! [`state`] holds the phase enum and its single transition function;
//! [`controller`] layers the form, the submit debounce and the
//! prediction/draft bookkeeping on top of it.

pub mod controller;
pub mod section;
pub mod state;

pub use controller::WizardController;
pub use section::{full_sections, quick_sections, FormMode, Section};
pub use state::{transition, Guards, WizardAction, WizardPhase};
