use std::collections::BTreeMap;

use super::error::{Result, ValidationError};
use super::types::{Entry, RatingRequest, RatingResult, ValueRange, WeightSet};

/// Run the full pipeline: average, normalize, weight, denormalize.
///
/// Scores far outside the value range can still overflow f64; such requests
/// are rejected as malformed instead of yielding a non-finite rating.
pub fn calculate_rating(request: &RatingRequest) -> Result<RatingResult> {
    let range = request.value_range();

    let averages = calculate_averages(request.data());
    let normalized = normalize_scores(&averages, range);
    let normalized_rating = weighted_rating(&normalized, request.weights())?;
    let final_rating = denormalize_rating(normalized_rating, range);

    if !final_rating.is_finite() {
        return Err(ValidationError::MalformedInput(
            "scores are too large to rate without overflowing".to_string(),
        ));
    }

    Ok(RatingResult {
        averages,
        normalized,
        normalized_rating,
        final_rating,
    })
}

/// Mean score per criterion. Criteria are taken from the first entry.
///
/// Expects a non-empty slice where every entry carries the first entry's
/// criteria; panics otherwise.
pub fn calculate_averages(data: &[Entry]) -> BTreeMap<String, f64> {
    let count = data.len() as f64;
    data[0]
        .keys()
        .map(|criterion| {
            let values = || data.iter().map(|entry| entry[criterion]);
            // Divide before summing so the total cannot overflow; rounding may
            // still nudge the sum past the extremes, so pin it between them
            let mean: f64 = values().map(|v| v / count).sum();
            let lo = values().fold(f64::INFINITY, f64::min);
            let hi = values().fold(f64::NEG_INFINITY, f64::max);
            (criterion.clone(), mean.clamp(lo, hi))
        })
        .collect()
}

/// Rescale each average into the unit interval of `range`. Not clamped.
pub fn normalize_scores(
    averages: &BTreeMap<String, f64>,
    range: ValueRange,
) -> BTreeMap<String, f64> {
    let span = range.span();
    averages
        .iter()
        .map(|(criterion, avg)| (criterion.clone(), (avg - range.min) / span))
        .collect()
}

/// Weighted sum of normalized scores.
pub fn weighted_rating(normalized: &BTreeMap<String, f64>, weights: &WeightSet) -> Result<f64> {
    let mut rating = 0.0;
    for (criterion, score) in normalized {
        let weight = weights
            .get(criterion)
            .ok_or_else(|| ValidationError::UnknownCriterion(criterion.clone()))?;
        rating += weight * score;
    }
    Ok(rating)
}

/// Map a normalized rating back into `range` units.
pub fn denormalize_rating(normalized_rating: f64, range: ValueRange) -> f64 {
    normalized_rating * range.span() + range.min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::validate_request;
    use serde_json::json;

    fn entry(pairs: &[(&str, f64)]) -> Entry {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_two_criteria_example() {
        let request = validate_request(&json!({
            "data": [{"a": 1, "b": 1}],
            "weights": {"a": 0.5, "b": 0.5},
            "value_range": {"min": 0, "max": 10}
        }))
        .unwrap();
        let result = calculate_rating(&request).unwrap();

        assert_eq!(result.averages, entry(&[("a", 1.0), ("b", 1.0)]));
        assert_close(result.normalized["a"], 0.1);
        assert_close(result.normalized["b"], 0.1);
        assert_close(result.normalized_rating, 0.1);
        assert_close(result.final_rating, 1.0);
    }

    #[test]
    fn test_single_criterion_example() {
        let request = validate_request(&json!({
            "data": [{"a": 1}, {"a": 10}],
            "weights": {"a": 1.0},
            "value_range": {"min": 1, "max": 10}
        }))
        .unwrap();
        let result = calculate_rating(&request).unwrap();

        assert_close(result.averages["a"], 5.5);
        assert_close(result.normalized["a"], 0.5);
        assert_close(result.normalized_rating, 0.5);
        assert_close(result.final_rating, 5.5);
    }

    #[test]
    fn test_presentation_example() {
        let request = validate_request(&json!({
            "data": [
                {"presentation": 8, "materials": 9, "knowledge": 7, "communication": 10},
                {"presentation": 7, "materials": 8, "knowledge": 9, "communication": 9},
                {"presentation": 9, "materials": 7, "knowledge": 8, "communication": 10}
            ],
            "weights": {
                "presentation": 0.25,
                "materials": 0.25,
                "knowledge": 0.25,
                "communication": 0.25
            },
            "value_range": {"min": 1, "max": 10}
        }))
        .unwrap();
        let result = calculate_rating(&request).unwrap();

        assert_close(result.averages["communication"], 29.0 / 3.0);
        assert_close(result.final_rating, 101.0 / 12.0);
        assert_eq!(result.rounded_rating(2), 8.42);
    }

    #[test]
    fn test_averages() {
        let data = vec![
            entry(&[("x", 2.0), ("y", 4.0)]),
            entry(&[("x", 4.0), ("y", 8.0)]),
        ];
        let averages = calculate_averages(&data);
        assert_eq!(averages, entry(&[("x", 3.0), ("y", 6.0)]));
    }

    #[test]
    fn test_normalize_is_not_clamped() {
        let averages = entry(&[("low", -5.0), ("high", 20.0)]);
        let normalized = normalize_scores(&averages, ValueRange { min: 0.0, max: 10.0 });
        assert_close(normalized["low"], -0.5);
        assert_close(normalized["high"], 2.0);
    }

    #[test]
    fn test_weighted_rating_unknown_criterion() {
        let normalized = entry(&[("a", 0.5), ("b", 0.5)]);
        let weights = entry(&[("a", 1.0)]);
        assert_eq!(
            weighted_rating(&normalized, &weights),
            Err(ValidationError::UnknownCriterion("b".to_string()))
        );
    }

    #[test]
    fn test_weighted_rating_ignores_unused_weights() {
        let normalized = entry(&[("a", 0.5)]);
        let weights = entry(&[("a", 0.6), ("b", 0.4)]);
        assert_close(weighted_rating(&normalized, &weights).unwrap(), 0.3);
    }

    #[test]
    fn test_denormalize() {
        let range = ValueRange { min: 1.0, max: 10.0 };
        assert_close(denormalize_rating(0.0, range), 1.0);
        assert_close(denormalize_rating(1.0, range), 10.0);
        assert_close(denormalize_rating(0.5, range), 5.5);
    }

    #[test]
    fn test_large_in_range_scores_stay_finite() {
        let request = validate_request(&json!({
            "data": [{"a": 1.5e308}, {"a": 1.5e308}],
            "weights": {"a": 1.0},
            "value_range": {"min": 0, "max": 1.6e308}
        }))
        .unwrap();
        let result = calculate_rating(&request).unwrap();

        assert!(result.final_rating.is_finite());
        assert!(request.value_range().contains(result.final_rating));
        assert_close(result.averages["a"] / 1.5e308, 1.0);
    }

    #[test]
    fn test_out_of_range_overflow_rejected() {
        let request = validate_request(&json!({
            "data": [{"a": -1.7e308}],
            "weights": {"a": 1.0},
            "value_range": {"min": 1e308, "max": 1.7e308}
        }))
        .unwrap();
        let err = calculate_rating(&request).unwrap_err();
        assert_eq!(err.kind(), "malformed_input");
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn test_repeated_calls_identical() {
        let request = validate_request(&json!({
            "data": [{"quality": 9, "design": 8, "functionality": 7}],
            "weights": {"quality": 0.4, "design": 0.3, "functionality": 0.3},
            "value_range": {"min": 1, "max": 10}
        }))
        .unwrap();
        let first = calculate_rating(&request).unwrap();
        let second = calculate_rating(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.final_rating.to_bits(),
            second.final_rating.to_bits()
        );
    }
}
