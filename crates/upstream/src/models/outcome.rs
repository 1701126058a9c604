use crate::errors::{AttemptError, RetryClass};

use super::Endpoint;

/// Successful upstream body, passed through untouched.
pub type Payload = String;

/// Raw response from a transport, before classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Payload,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<Payload>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Tagged result of one attempt against one endpoint.
///
/// The orchestrator's retry decision is a pure function of this value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 2xx response; the run ends here.
    Success(Payload),
    /// Worth another attempt on the same endpoint while budget remains.
    RetryableFailure(AttemptError),
    /// The endpoint rejected the request; move on to the next endpoint.
    FatalFailure(AttemptError),
}

impl AttemptOutcome {
    /// Classify the raw result of a transport call.
    pub fn classify(result: Result<UpstreamResponse, AttemptError>) -> Self {
        let error = match result {
            Ok(response) if response.is_success() => return Self::Success(response.body),
            Ok(response) => AttemptError::Status {
                status: response.status,
            },
            Err(error) => error,
        };

        match error.retry_class() {
            RetryClass::Retryable => Self::RetryableFailure(error),
            RetryClass::Fatal => Self::FatalFailure(error),
        }
    }
}

/// Record of a single failed attempt during a fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRecord {
    pub endpoint: Endpoint,
    /// 1-indexed attempt number on this endpoint.
    pub attempt: u32,
    pub error: AttemptError,
    pub class: RetryClass,
}

impl AttemptRecord {
    pub fn new(endpoint: Endpoint, attempt: u32, error: AttemptError) -> Self {
        let class = error.retry_class();
        Self {
            endpoint,
            attempt,
            error,
            class,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_2xx_is_success() {
        let outcome = AttemptOutcome::classify(Ok(UpstreamResponse::new(200, "{}")));
        assert_eq!(outcome, AttemptOutcome::Success("{}".to_string()));

        let outcome = AttemptOutcome::classify(Ok(UpstreamResponse::new(204, "")));
        assert_eq!(outcome, AttemptOutcome::Success(String::new()));
    }

    #[test]
    fn test_404_is_fatal() {
        let outcome = AttemptOutcome::classify(Ok(UpstreamResponse::new(404, "not found")));
        assert_eq!(
            outcome,
            AttemptOutcome::FatalFailure(AttemptError::Status { status: 404 })
        );
    }

    #[test]
    fn test_429_and_5xx_are_retryable() {
        for status in [429, 500, 504] {
            let outcome = AttemptOutcome::classify(Ok(UpstreamResponse::new(status, "")));
            assert_eq!(
                outcome,
                AttemptOutcome::RetryableFailure(AttemptError::Status { status })
            );
        }
    }

    #[test]
    fn test_timeout_is_retryable() {
        let error = AttemptError::Timeout(Duration::from_secs(60));
        let outcome = AttemptOutcome::classify(Err(error.clone()));
        assert_eq!(outcome, AttemptOutcome::RetryableFailure(error));
    }
}
