pub mod draft;
pub mod prediction;

pub use draft::{CreateListingPayload, DraftField, ListingDraft, ListingRecord, ListingStatus};
pub use prediction::{PredictedPrice, PredictionRequest};
