//! Upstream models
//!
//! This module contains the core data types for upstream fetching:
//! - `endpoint` - Candidate addresses of the external service (Endpoint)
//! - `policy` - Retry budget, backoff and deadline configuration (RetryPolicy)
//! - `outcome` - Result of a single attempt (AttemptOutcome, AttemptRecord, UpstreamResponse)

mod endpoint;
mod outcome;
mod policy;

pub use endpoint::Endpoint;
pub use outcome::{AttemptOutcome, AttemptRecord, Payload, UpstreamResponse};
pub use policy::{RetryPolicy, DEFAULT_BASE_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT};
