use std::any::Any;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hospitals::Error as HospitalsError;
use serde::Serialize;
use thiserror::Error;

const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch hospitals from Overpass";
const UPSTREAM_FAILURE_NOTE: &str = "This usually means the Overpass servers are overloaded or \
     your query timed out. Try again in a minute or reduce the bounding box.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Hospitals(#[from] HospitalsError),
    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: Duration },
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize, Debug)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            note: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Hospitals(e) => match e {
                HospitalsError::Validation(reason) => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::message(reason.to_string()),
                ),
                // The fault is upstream: never report it as our own.
                HospitalsError::Upstream(_) | HospitalsError::InvalidUpstreamPayload(_) => {
                    tracing::warn!("Upstream failure surfaced to client: {}", e);
                    (
                        StatusCode::BAD_GATEWAY,
                        ErrorBody {
                            error: UPSTREAM_FAILURE_MESSAGE.to_string(),
                            details: Some(e.to_string()),
                            note: Some(UPSTREAM_FAILURE_NOTE.to_string()),
                        },
                    )
                }
            },
            ApiError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody::message(self.to_string()),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, ErrorBody::message(self.to_string())),
            ApiError::Internal(reason) => {
                tracing::error!("Internal error: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Internal server error".to_string(),
                        details: Some(reason.clone()),
                        note: None,
                    },
                )
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimited { retry_after } = self {
            let seconds = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Turn a panic caught while serving a request into a 500.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(reason).into_response()
}
