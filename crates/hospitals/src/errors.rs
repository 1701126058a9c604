//! Error types for hospital lookups.

use hospitals_upstream::FetchError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Every Overpass endpoint failed. The fault is upstream, not ours.
    #[error("{0}")]
    Upstream(#[from] FetchError),

    /// Overpass answered 2xx with a body that is not the expected JSON.
    #[error("Invalid Overpass payload: {0}")]
    InvalidUpstreamPayload(String),
}

impl Error {
    /// True when the failure originates in the external service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::InvalidUpstreamPayload(_))
    }
}

/// Rejections raised before any network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid wilaya number. Must be between 01 and 58.")]
    UnknownWilaya(String),
}
