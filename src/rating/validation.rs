use serde_json::{Map, Value};

use super::error::{Result, ValidationError};
use super::types::{Entry, RatingRequest, ValueRange, WeightSet};

/// Absolute tolerance when checking that weights sum to 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Parse a raw request body and validate it.
pub fn parse_request(body: &[u8]) -> Result<RatingRequest> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedInput(format!("body is not valid JSON: {}", e)))?;
    validate_request(&value)
}

/// Turn raw structured input into a [`RatingRequest`].
///
/// Checks run in a fixed order: `data`, `weights`, `value_range`, then the
/// cross-check that every scored criterion has a weight. The first failure
/// is returned.
pub fn validate_request(input: &Value) -> Result<RatingRequest> {
    let root = input
        .as_object()
        .ok_or_else(|| malformed("request must be a JSON object"))?;

    let data = validate_data(field(root, "data")?)?;
    let weights = validate_weights(field(root, "weights")?)?;
    let value_range = validate_value_range(field(root, "value_range")?)?;

    // Every entry shares the first entry's keys at this point
    for criterion in data[0].keys() {
        if !weights.contains_key(criterion) {
            return Err(ValidationError::UnknownCriterion(criterion.clone()));
        }
    }

    Ok(RatingRequest {
        data,
        weights,
        value_range,
    })
}

fn validate_data(value: &Value) -> Result<Vec<Entry>> {
    let items = value
        .as_array()
        .ok_or_else(|| malformed("data must be an array of entries"))?;
    if items.is_empty() {
        return Err(ValidationError::EmptyData);
    }

    let mut entries: Vec<Entry> = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| malformed(format!("data[{}] must be an object", i)))?;
        if object.is_empty() {
            return Err(malformed(format!("data[{}] has no criteria", i)));
        }
        let entry = numeric_map(object, &format!("data[{}]", i))?;

        if let Some(first) = entries.first() {
            if !first.keys().eq(entry.keys()) {
                return Err(ValidationError::MismatchedCriteria {
                    index: i,
                    expected: join_keys(first),
                    found: join_keys(&entry),
                });
            }
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn validate_weights(value: &Value) -> Result<WeightSet> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed("weights must be an object"))?;
    if object.is_empty() {
        return Err(malformed("weights must not be empty"));
    }
    let weights = numeric_map(object, "weights")?;

    if let Some((name, w)) = weights.iter().find(|(_, w)| **w < 0.0) {
        return Err(ValidationError::InvalidWeights(format!(
            "weight for '{}' is negative ({})",
            name, w
        )));
    }

    let sum: f64 = weights.values().sum();
    if (sum - 1.0).abs() >= WEIGHT_SUM_TOLERANCE {
        return Err(ValidationError::InvalidWeights(format!(
            "weights must sum to 1, got {}",
            sum
        )));
    }
    Ok(weights)
}

fn validate_value_range(value: &Value) -> Result<ValueRange> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed("value_range must be an object with min and max"))?;
    let min = number(field(object, "min")?, "value_range.min")?;
    let max = number(field(object, "max")?, "value_range.max")?;

    if min >= max || !(max - min).is_finite() {
        return Err(ValidationError::InvalidRange { min, max });
    }
    Ok(ValueRange { min, max })
}

fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    object
        .get(name)
        .ok_or_else(|| malformed(format!("missing required field '{}'", name)))
}

fn numeric_map(object: &Map<String, Value>, path: &str) -> Result<Entry> {
    object
        .iter()
        .map(|(key, v)| Ok((key.clone(), number(v, &format!("{}.{}", path, key))?)))
        .collect()
}

fn number(value: &Value, path: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| malformed(format!("{} must be a number, got {}", path, value)))
}

fn join_keys(entry: &Entry) -> String {
    entry.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn malformed(msg: impl Into<String>) -> ValidationError {
    ValidationError::MalformedInput(msg.into())
}
