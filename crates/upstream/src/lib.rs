//! Hospitals Upstream Crate
//!
//! This crate shields callers from an unstable external HTTP service. It knows
//! nothing about hospitals or Overpass: it moves an opaque query to an ordered
//! list of endpoints and memoizes successful payloads.
//!
//! # Overview
//!
//! The upstream crate supports:
//! - Ordered endpoint fallback (no concurrent racing)
//! - Per-endpoint retry budgets with exponential backoff
//! - Retryable vs. fatal classification of every attempt
//! - A TTL-bounded, key-scoped response cache
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |     Caller       | --> |  ResponseCache   |  (hit: return cached value)
//! +------------------+     +------------------+
//!          |
//!          | miss
//!          v
//! +------------------+     +------------------+
//! | FetchOrchestrator| --> |   RetryPolicy    |  (attempt budget, backoff, deadline)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! | UpstreamTransport| --> |  AttemptOutcome  |  (Success / Retryable / Fatal)
//! +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Endpoint`] - One candidate address of the external service
//! - [`RetryPolicy`] - Attempt budget, backoff base and per-attempt deadline
//! - [`FetchOrchestrator`] - Runs the fallback/retry loop
//! - [`AttemptOutcome`] - Tagged result of a single attempt
//! - [`ResponseCache`] - TTL cache consulted before and filled after a fetch
//! - [`FetchError`] - The only failure that escapes the orchestrator

pub mod cache;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod transport;

pub use cache::{ResponseCache, DEFAULT_CACHE_TTL};
pub use errors::{AttemptError, EndpointsExhausted, FetchError, RetryClass, TransportSetupError};
pub use models::{AttemptOutcome, AttemptRecord, Endpoint, Payload, RetryPolicy, UpstreamResponse};
pub use orchestrator::FetchOrchestrator;
pub use transport::{HttpTransport, HttpTransportConfig, UpstreamTransport};
