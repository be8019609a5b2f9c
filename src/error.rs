use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::filter::FilterError;

pub type AppResult<T> = Result<T, AppError>;

/// Errors a request handler can surface to the client.
///
/// Every variant renders as `{"error": "..."}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Outlet filtering exploded: {0}")]
    Filter(#[from] FilterError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Filter(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::BadRequest(msg) => warn!(error = %msg, "Rejected request"),
            AppError::Filter(e) => error!(error = %e, "Outlet filter failed"),
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let response = AppError::BadRequest("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn filter_error_maps_to_500() {
        let bad = regex::Regex::new("(").unwrap_err();
        let err: AppError = FilterError::InvalidRegex(bad).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Outlet filtering exploded"));
    }
}
