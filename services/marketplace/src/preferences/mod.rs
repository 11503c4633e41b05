//! Buyer preference range queries
//!
//! Paired min/max constraints are checked by [`validate`] and projected onto
//! the recommendation wire format by [`query`].

pub mod fields;
pub mod form;
pub mod query;
pub mod validate;

pub use fields::{PreferenceField, PreferenceKind, RangePair, PREFERENCE_FIELDS, RANGE_PAIRS};
pub use form::{PreferenceForm, RANGE_ERROR_MESSAGE};
pub use query::{build_query, PreferenceQuery};
pub use validate::{first_violation, is_valid, pair_has_error};
