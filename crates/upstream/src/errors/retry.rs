/// Classification for retry policy.
///
/// Used by the orchestrator to decide what to do after a failed attempt.
///
/// # Behavior Summary
///
/// | Class | Retry Same Endpoint? | Try Next Endpoint? |
/// |-------|----------------------|--------------------|
/// | `Retryable` | Yes, while budget remains | Yes, once budget is spent |
/// | `Fatal` | No | Yes, immediately |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure: timeout, transport error, 5xx, 429 or any other
    /// non-2xx response that is not a client error.
    Retryable,

    /// The endpoint rejected the request itself (4xx other than 429).
    /// Repeating the same request against it will not succeed, but another
    /// endpoint might accept it.
    Fatal,
}

impl RetryClass {
    /// Classify an HTTP status code that was not a success.
    pub fn from_status(status: u16) -> Self {
        if (400..500).contains(&status) && status != 429 {
            Self::Fatal
        } else {
            Self::Retryable
        }
    }
}

impl std::fmt::Display for RetryClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Retryable => write!(f, "retryable"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}
