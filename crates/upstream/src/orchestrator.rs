//! Fetch orchestrator for delivering a query to an unstable external service.
//!
//! The orchestrator walks an ordered endpoint list, handling:
//! - A bounded attempt budget per endpoint
//! - Exponential backoff between attempts on the same endpoint
//! - Immediate fallback on fatal (client-class) failures
//! - A hard deadline on every attempt
//!
//! Endpoints are tried strictly in order; the first success wins and no
//! later endpoint is contacted. The orchestrator holds no mutable state, so a
//! single instance can serve any number of concurrent callers.
//!
//! Cancellation is structural: dropping the future returned by
//! [`FetchOrchestrator::fetch`] aborts the in-flight attempt and any pending
//! backoff sleep.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::errors::{AttemptError, EndpointsExhausted, FetchError};
use crate::models::{AttemptOutcome, AttemptRecord, Endpoint, Payload, RetryPolicy};
use crate::transport::UpstreamTransport;

/// Runs the ordered-fallback retry loop over an [`UpstreamTransport`].
#[derive(Clone)]
pub struct FetchOrchestrator {
    transport: Arc<dyn UpstreamTransport>,
}

impl FetchOrchestrator {
    pub fn new(transport: Arc<dyn UpstreamTransport>) -> Self {
        Self { transport }
    }

    /// Deliver `query` to the first endpoint that accepts it.
    ///
    /// For each endpoint in order, up to `policy.max_attempts_per_endpoint`
    /// attempts are made:
    /// 1. Send with `policy.request_timeout` as the deadline
    /// 2. Classify the outcome
    /// 3. Success: return the payload
    /// 4. Fatal failure: move to the next endpoint right away
    /// 5. Retryable failure: sleep `policy.backoff_after(attempt)` and retry,
    ///    or move on once the budget is spent
    ///
    /// Returns [`FetchError::AllEndpointsFailed`] with the full attempt history
    /// when every endpoint is exhausted.
    pub async fn fetch(
        &self,
        query: &str,
        endpoints: &[Endpoint],
        policy: &RetryPolicy,
    ) -> Result<Payload, FetchError> {
        if endpoints.is_empty() {
            warn!("Fetch requested with no upstream endpoints");
            return Err(FetchError::NoEndpoints);
        }

        let max_attempts = policy.attempts_per_endpoint();
        let mut attempted: Vec<Endpoint> = Vec::with_capacity(endpoints.len());
        let mut failures: Vec<AttemptRecord> = Vec::new();

        for endpoint in endpoints {
            attempted.push(endpoint.clone());
            let mut attempt = 0;

            while attempt < max_attempts {
                attempt += 1;

                match self.attempt(endpoint, query, policy.request_timeout).await {
                    AttemptOutcome::Success(payload) => {
                        debug!(
                            "Upstream success from '{}' on attempt {} ({} bytes)",
                            endpoint,
                            attempt,
                            payload.len()
                        );
                        return Ok(payload);
                    }
                    AttemptOutcome::FatalFailure(error) => {
                        warn!(
                            "[upstream] endpoint={} attempt={} status={} message={}",
                            endpoint,
                            attempt,
                            status_label(&error),
                            error
                        );
                        warn!("Non-retriable failure on '{}', switching endpoint", endpoint);
                        failures.push(AttemptRecord::new(endpoint.clone(), attempt, error));
                        break;
                    }
                    AttemptOutcome::RetryableFailure(error) => {
                        warn!(
                            "[upstream] endpoint={} attempt={} status={} message={}",
                            endpoint,
                            attempt,
                            status_label(&error),
                            error
                        );
                        failures.push(AttemptRecord::new(endpoint.clone(), attempt, error));

                        if attempt >= max_attempts {
                            warn!(
                                "Exhausted {} attempts for '{}', switching to next endpoint",
                                max_attempts, endpoint
                            );
                            break;
                        }

                        let delay = policy.backoff_after(attempt);
                        debug!("Backing off {:?} before retrying '{}'", delay, endpoint);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        info!(
            "All {} upstream endpoints failed after {} attempts",
            attempted.len(),
            failures.len()
        );
        Err(FetchError::AllEndpointsFailed(EndpointsExhausted {
            endpoints: attempted,
            attempts: failures,
        }))
    }

    /// One attempt with a hard deadline, classified.
    async fn attempt(&self, endpoint: &Endpoint, query: &str, timeout: Duration) -> AttemptOutcome {
        let send = self.transport.send(endpoint, query, timeout);
        let result = match tokio::time::timeout(timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(AttemptError::Timeout(timeout)),
        };
        AttemptOutcome::classify(result)
    }
}

fn status_label(error: &AttemptError) -> String {
    error
        .status()
        .map(|status| status.to_string())
        .unwrap_or_else(|| "ERR".to_string())
}
