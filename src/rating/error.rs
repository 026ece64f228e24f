use thiserror::Error;

/// Reasons a rating request is rejected.
///
/// Every variant is a defect in the client's input. None are retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Body is not JSON, or a field has the wrong shape or type
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("data must contain at least one entry")]
    EmptyData,

    /// Weights are negative or do not sum to 1
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// `min >= max`, or `max - min` does not fit in an f64
    #[error(
        "invalid value range: min ({min}) must be less than max ({max}) and their difference finite"
    )]
    InvalidRange { min: f64, max: f64 },

    /// A criterion is scored but has no weight
    #[error("unknown criterion '{0}': no weight is defined for it")]
    UnknownCriterion(String),

    /// An entry does not carry the same criteria as the first entry
    #[error("entry {index} has criteria [{found}], expected [{expected}]")]
    MismatchedCriteria {
        index: usize,
        expected: String,
        found: String,
    },
}

impl ValidationError {
    /// Stable machine-readable identifier, used in error response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MalformedInput(_) => "malformed_input",
            ValidationError::EmptyData => "empty_data",
            ValidationError::InvalidWeights(_) => "invalid_weights",
            ValidationError::InvalidRange { .. } => "invalid_range",
            ValidationError::UnknownCriterion(_) => "unknown_criterion",
            ValidationError::MismatchedCriteria { .. } => "mismatched_criteria",
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;
