//! Error types for the insights service and its HTTP surface.
//!
//! The analysis itself never fails; these cover request validation and
//! server configuration.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for InsightsError {
    fn into_response(self) -> Response {
        let status = match self {
            InsightsError::Validation(_) => StatusCode::BAD_REQUEST,
            InsightsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub type InsightsResult<T> = Result<T, InsightsError>;
