//! Request/response boundary for the rating pipeline.
//!
//! Two flows mirror what a web front end exposes:
//! 1. [`calculate`] answers inline with `{"final_rating": ...}`
//! 2. [`upload`] answers with a rounded result file served as an attachment
//!
//! Responses are plain `http::Response` values so any transport can serve
//! them. Nothing is written to disk here. Log events are emitted from this
//! layer only; the validator and engine stay pure.

use http::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{Response, StatusCode};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::rating::{
    calculate_rating, parse_request, RatingRequest, RatingResult, ValidationError,
};

/// File name offered to clients downloading an upload result.
pub const RESULT_FILENAME: &str = "result.json";

/// A validated request together with its computed result.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub request: RatingRequest,
    pub result: RatingResult,
}

/// Validate a request body and run the full pipeline.
pub fn evaluate(body: &[u8]) -> Result<Evaluation, ValidationError> {
    debug!(bytes = body.len(), "rating request received");

    let outcome = parse_request(body).and_then(|request| {
        let result = calculate_rating(&request)?;
        info!(
            entries = request.data().len(),
            criteria = result.averages.len(),
            final_rating = result.final_rating,
            "rating computed"
        );
        Ok(Evaluation { request, result })
    });

    if let Err(ref e) = outcome {
        warn!(kind = e.kind(), error = %e, "rating request rejected");
    }
    outcome
}

/// Inline flow: 200 with the unrounded final rating, or 400 on bad input.
pub fn calculate(body: &[u8]) -> Response<String> {
    match evaluate(body) {
        Ok(evaluation) => json_response(
            StatusCode::OK,
            json!({ "final_rating": evaluation.result.final_rating }).to_string(),
        ),
        Err(e) => error_response(&e),
    }
}

/// File flow: the final rating rounded to `precision` decimals, served as a
/// downloadable `result.json`.
pub fn upload(body: &[u8], precision: u32) -> Response<String> {
    match evaluate(body) {
        Ok(evaluation) => {
            let rounded = evaluation.result.rounded_rating(precision);
            let document = json!({ "final_rating": rounded });
            let mut response = json_response(StatusCode::OK, format!("{:#}\n", document));
            let disposition = format!("attachment; filename=\"{}\"", RESULT_FILENAME);
            if let Ok(value) = HeaderValue::from_str(&disposition) {
                response.headers_mut().insert(CONTENT_DISPOSITION, value);
            }
            response
        }
        Err(e) => error_response(&e),
    }
}

/// 400 response carrying the error kind and message.
pub fn error_response(err: &ValidationError) -> Response<String> {
    let body = json!({
        "error": {
            "kind": err.kind(),
            "message": err.to_string(),
        }
    });
    json_response(StatusCode::BAD_REQUEST, body.to_string())
}

fn json_response(status: StatusCode, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
