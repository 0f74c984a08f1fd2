//! Error types for the gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Api Error ==
/// Failure talking to the backend API.
///
/// This is what fetch functions behind the cache return; cached calls pass
/// it through unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Request never produced a response (connect, timeout, ...)
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// Response body was not the expected JSON
    #[error("Invalid backend response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a backend rejection, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

// == Invalid Course Id ==
/// A course id outside `[A-Za-z0-9-]{1,64}`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid course id '{0}'")]
pub struct InvalidCourseId(pub String);

// == Gateway Error Enum ==
/// Unified error type for gateway handlers.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<InvalidCourseId> for GatewayError {
    fn from(err: InvalidCourseId) -> Self {
        GatewayError::InvalidRequest(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::Api(ApiError::Status { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Api(_) => StatusCode::BAD_GATEWAY,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };
        let message = match &self {
            GatewayError::Api(ApiError::Status { message, .. }) => message.clone(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for gateway handlers.
pub type Result<T> = std::result::Result<T, GatewayError>;
