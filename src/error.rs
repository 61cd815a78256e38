//! Request error taxonomy and its HTTP mapping
//!
//! Every failed request answers with `{"failed": true, "reason": "..."}`.
//! Validation failures are 400; anything that goes wrong after validation
//! passes is 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::assets::AssetError;

/// JSON body of every failure response.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub failed: bool,
    pub reason: String,
}

/// Everything that can terminate a request. The display text is the
/// client-facing reason string.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required query parameter was absent
    #[error("{0} value not provided")]
    MissingParameter(&'static str),
    /// A query parameter failed to parse or fell outside its range
    #[error("{0} value is invalid")]
    InvalidParameter(&'static str),
    /// Asset lookup or decode failed after validation passed
    #[error("Failed process image")]
    Asset(#[from] AssetError),
    /// PNG encoding of the response failed
    #[error("Failed process image")]
    Encode(#[from] image::ImageError),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::MissingParameter(_) | RequestError::InvalidParameter(_) => {
                StatusCode::BAD_REQUEST
            }
            RequestError::Asset(_) | RequestError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request processing failed");
        } else {
            tracing::warn!(reason = %self, "rejected request");
        }
        let body = FailureBody {
            failed: true,
            reason: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings_match_wire_format() {
        assert_eq!(
            RequestError::MissingParameter("R").to_string(),
            "R value not provided"
        );
        assert_eq!(
            RequestError::InvalidParameter("Bird ID").to_string(),
            "Bird ID value is invalid"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RequestError::MissingParameter("G").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RequestError::InvalidParameter("ID").status(),
            StatusCode::BAD_REQUEST
        );
        let decode = RequestError::Asset(AssetError::Missing("x.png".into()));
        assert_eq!(decode.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_failure_body_shape() {
        let body = FailureBody {
            failed: true,
            reason: "R value is invalid".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"failed": true, "reason": "R value is invalid"})
        );
    }
}
