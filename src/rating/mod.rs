pub mod engine;
pub mod error;
pub mod types;
pub mod validation;

pub use engine::{
    calculate_averages, calculate_rating, denormalize_rating, normalize_scores, weighted_rating,
};
pub use error::ValidationError;
pub use types::{Entry, RatingRequest, RatingResult, ValueRange, WeightSet};
pub use validation::{parse_request, validate_request, WEIGHT_SUM_TOLERANCE};
