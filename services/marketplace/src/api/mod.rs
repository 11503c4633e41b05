pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpApi;
pub use mock::{CapturedListing, MockApi};
pub use traits::{
    ListingCreator, PredictionClient, RecommendationClient, RecommendationMatch, Recommendations,
};
