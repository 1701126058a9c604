//! Error types and retry classification for the upstream crate.
//!
//! This module provides:
//! - [`AttemptError`]: Why a single attempt against one endpoint failed
//! - [`RetryClass`]: Classification deciding whether an endpoint gets another attempt
//! - [`FetchError`]: The terminal error returned by the orchestrator
//! - [`TransportSetupError`]: Failures while building the HTTP transport

mod retry;

pub use retry::RetryClass;

use std::time::Duration;

use thiserror::Error;

use crate::models::{AttemptRecord, Endpoint};

/// Why a single attempt failed.
///
/// Never surfaced to callers on its own; it only appears as context inside
/// [`FetchError::AllEndpointsFailed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// The endpoint answered with a non-2xx status.
    #[error("Upstream returned status {status}")]
    Status {
        /// The HTTP status code
        status: u16,
    },

    /// The attempt did not complete before the per-attempt deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("Transport error: {0}")]
    Transport(String),
}

impl AttemptError {
    /// Returns the HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Timeout(_) | Self::Transport(_) => None,
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// Only a client-class status other than 429 is fatal; timeouts and
    /// transport errors are always retryable.
    ///
    /// # Examples
    ///
    /// ```
    /// use hospitals_upstream::errors::{AttemptError, RetryClass};
    ///
    /// let error = AttemptError::Status { status: 429 };
    /// assert_eq!(error.retry_class(), RetryClass::Retryable);
    ///
    /// let error = AttemptError::Status { status: 404 };
    /// assert_eq!(error.retry_class(), RetryClass::Fatal);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Status { status } => RetryClass::from_status(*status),
            Self::Timeout(_) | Self::Transport(_) => RetryClass::Retryable,
        }
    }
}

/// Every endpoint was tried and none returned a successful payload.
///
/// Carries the full attempt history so operators can see which endpoint
/// failed how. It has no retry affordance: callers treat it as one failed
/// operation.
#[derive(Debug, Clone)]
pub struct EndpointsExhausted {
    /// Endpoints that were attempted, in the order they were tried.
    pub endpoints: Vec<Endpoint>,
    /// Every failed attempt, in order.
    pub attempts: Vec<AttemptRecord>,
}

impl EndpointsExhausted {
    /// The error of the final attempt of the run.
    pub fn last_error(&self) -> Option<&AttemptError> {
        self.attempts.last().map(|record| &record.error)
    }

    /// Total number of attempts made across all endpoints.
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Number of attempts made against a single endpoint.
    pub fn attempts_for(&self, endpoint: &Endpoint) -> usize {
        self.attempts
            .iter()
            .filter(|record| &record.endpoint == endpoint)
            .count()
    }
}

impl std::fmt::Display for EndpointsExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tried = self
            .endpoints
            .iter()
            .map(Endpoint::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "All upstream endpoints failed (tried: {})", tried)?;
        if let Some(last) = self.last_error() {
            write!(f, ": {}", last)?;
        }
        Ok(())
    }
}

/// Errors returned by [`FetchOrchestrator::fetch`](crate::FetchOrchestrator::fetch).
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// The orchestrator was called with an empty endpoint list.
    #[error("No upstream endpoints configured")]
    NoEndpoints,

    /// All endpoints were tried and all failed.
    /// This is a terminal error after exhausting all options.
    #[error("{0}")]
    AllEndpointsFailed(EndpointsExhausted),
}

/// Errors raised while building an [`HttpTransport`](crate::HttpTransport).
#[derive(Error, Debug)]
pub enum TransportSetupError {
    /// A configured header value cannot be sent over HTTP.
    #[error("Invalid value for header {name}: {value:?}")]
    InvalidHeader {
        /// Header name
        name: &'static str,
        /// The rejected value
        value: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
