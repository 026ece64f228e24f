use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One respondent's scores, keyed by criterion name.
pub type Entry = BTreeMap<String, f64>;

/// Criterion name to weight. Weights are non-negative and sum to 1.
pub type WeightSet = BTreeMap<String, f64>;

/// Declared bounds for raw scores, also the target of denormalization.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Distance between the bounds. Positive for any validated range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A validated rating request.
///
/// Only [`validate_request`](super::validate_request) builds one, so every
/// instance has at least one entry, a consistent criterion set, weights that
/// sum to 1 and cover every criterion, and `min < max`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRequest {
    pub(super) data: Vec<Entry>,
    pub(super) weights: WeightSet,
    pub(super) value_range: ValueRange,
}

impl RatingRequest {
    pub fn data(&self) -> &[Entry] {
        &self.data
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    /// Criterion names, taken from the first entry.
    pub fn criteria(&self) -> impl Iterator<Item = &str> {
        self.data
            .first()
            .into_iter()
            .flat_map(|entry| entry.keys().map(String::as_str))
    }
}

/// Output of the rating pipeline, with every intermediate stage kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingResult {
    pub averages: BTreeMap<String, f64>,
    pub normalized: BTreeMap<String, f64>,
    pub normalized_rating: f64,
    pub final_rating: f64,
}

impl RatingResult {
    /// Final rating rounded half away from zero to `precision` decimals.
    pub fn rounded_rating(&self, precision: u32) -> f64 {
        let factor = 10f64.powi(precision as i32);
        let scaled = self.final_rating * factor;
        if !scaled.is_finite() {
            return self.final_rating;
        }
        scaled.round() / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_span_and_contains() {
        let range = ValueRange { min: 1.0, max: 10.0 };
        assert_eq!(range.span(), 9.0);
        assert!(range.contains(1.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(10.5));
    }

    #[test]
    fn test_rounded_rating() {
        let result = RatingResult {
            averages: BTreeMap::new(),
            normalized: BTreeMap::new(),
            normalized_rating: 0.0,
            final_rating: 8.416666,
        };
        assert_eq!(result.rounded_rating(2), 8.42);
        assert_eq!(result.rounded_rating(0), 8.0);
    }

    #[test]
    fn test_rounded_rating_large_value_unchanged() {
        let result = RatingResult {
            averages: BTreeMap::new(),
            normalized: BTreeMap::new(),
            normalized_rating: 1.0,
            final_rating: 1.5e308,
        };
        assert_eq!(result.rounded_rating(12), 1.5e308);
    }
}
