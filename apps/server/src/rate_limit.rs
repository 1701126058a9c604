//! Per-client token bucket rate limiting for the `/api` routes.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Key shared by every request whose peer address is unknown.
const UNKNOWN_CLIENT: &str = "unknown";

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// A client's budget after a request was counted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quota {
    pub limit: u32,
    pub remaining: u32,
    /// Time until the bucket is full again.
    pub reset_after: Duration,
}

impl Quota {
    /// Write the `RateLimit-*` headers.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(RATELIMIT_RESET, HeaderValue::from(ceil_secs(self.reset_after)));
    }
}

/// Rejection for a client with no token left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exceeded {
    pub quota: Quota,
    pub retry_after: Duration,
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs_f64().ceil() as u64
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn full(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn refill(&mut self, now: Instant, rate: f64, capacity: f64) {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(capacity);
        self.last_update = now;
    }
}

/// Token buckets keyed by client address.
///
/// Each client may burst up to `requests_per_minute` requests and then
/// refills continuously at the same per-minute rate.
pub struct ClientRateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    rate: f64,
    capacity: f64,
}

impl ClientRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = requests_per_minute.max(1) as f64;
        Self {
            buckets: Mutex::new(HashMap::new()),
            rate: per_minute / 60.0,
            capacity: per_minute,
        }
    }

    fn quota(&self, bucket: &TokenBucket) -> Quota {
        let missing = (self.capacity - bucket.tokens).max(0.0);
        Quota {
            limit: self.capacity as u32,
            remaining: bucket.tokens.floor().max(0.0) as u32,
            reset_after: Duration::from_secs_f64(missing / self.rate),
        }
    }

    /// A poisoned lock only risks slightly wrong limiting, so recover.
    fn lock_buckets(&self) -> MutexGuard<'_, HashMap<String, TokenBucket>> {
        self.buckets.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Rate limiter buckets mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Take a token for `client`, or report how long until one is available.
    pub fn try_acquire(&self, client: &str) -> Result<Quota, Exceeded> {
        self.try_acquire_at(client, Instant::now())
    }

    pub fn try_acquire_at(&self, client: &str, now: Instant) -> Result<Quota, Exceeded> {
        let mut buckets = self.lock_buckets();
        let bucket = buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::full(self.capacity, now));
        bucket.refill(now, self.rate, self.capacity);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(self.quota(bucket))
        } else {
            let seconds_needed = (1.0 - bucket.tokens) / self.rate;
            Err(Exceeded {
                quota: self.quota(bucket),
                retry_after: Duration::from_secs_f64(seconds_needed),
            })
        }
    }

    /// Forget clients whose bucket has refilled completely.
    pub fn prune_idle(&self) -> usize {
        self.prune_idle_at(Instant::now())
    }

    pub fn prune_idle_at(&self, now: Instant) -> usize {
        let mut buckets = self.lock_buckets();
        let before = buckets.len();
        buckets.retain(|_, bucket| {
            bucket.refill(now, self.rate, self.capacity);
            bucket.tokens < self.capacity
        });
        before - buckets.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.lock_buckets().len()
    }
}

/// Middleware rejecting clients that ran out of tokens with 429.
pub async fn rate_limit(
    State(limiter): State<Arc<ClientRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    match limiter.try_acquire(&client) {
        Ok(quota) => {
            let mut response = next.run(request).await;
            quota.apply(response.headers_mut());
            response
        }
        Err(exceeded) => {
            tracing::warn!("Rate limit exceeded for client {}", client);
            let mut response = ApiError::RateLimited {
                retry_after: exceeded.retry_after,
            }
            .into_response();
            exceeded.quota.apply(response.headers_mut());
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_reject() {
        let limiter = ClientRateLimiter::new(3);
        let t0 = Instant::now();

        for _ in 0..3 {
            assert!(limiter.try_acquire_at("10.0.0.1", t0).is_ok());
        }
        let exceeded = limiter.try_acquire_at("10.0.0.1", t0).unwrap_err();
        assert_eq!(exceeded.retry_after, Duration::from_secs(20));
        assert_eq!(exceeded.quota.remaining, 0);
        assert_eq!(exceeded.quota.reset_after, Duration::from_secs(60));
    }

    #[test]
    fn test_quota_counts_down() {
        let limiter = ClientRateLimiter::new(30);
        let t0 = Instant::now();

        let first = limiter.try_acquire_at("10.0.0.2", t0).unwrap();
        assert_eq!(first.limit, 30);
        assert_eq!(first.remaining, 29);
        assert_eq!(first.reset_after, Duration::from_secs(2));

        let second = limiter.try_acquire_at("10.0.0.2", t0).unwrap();
        assert_eq!(second.remaining, 28);
        assert_eq!(second.reset_after, Duration::from_secs(4));
    }

    #[test]
    fn test_quota_headers() {
        let quota = Quota {
            limit: 30,
            remaining: 7,
            reset_after: Duration::from_millis(2500),
        };
        let mut headers = HeaderMap::new();

        quota.apply(&mut headers);

        assert_eq!(headers["ratelimit-limit"], "30");
        assert_eq!(headers["ratelimit-remaining"], "7");
        assert_eq!(headers["ratelimit-reset"], "3");
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = ClientRateLimiter::new(1);
        let t0 = Instant::now();

        assert!(limiter.try_acquire_at("a", t0).is_ok());
        assert!(limiter.try_acquire_at("a", t0).is_err());
        assert!(limiter.try_acquire_at("b", t0).is_ok());
    }

    #[test]
    fn test_tokens_refill_over_time() {
        let limiter = ClientRateLimiter::new(60);
        let t0 = Instant::now();

        for _ in 0..60 {
            assert!(limiter.try_acquire_at("c", t0).is_ok());
        }
        assert!(limiter.try_acquire_at("c", t0).is_err());
        assert!(limiter
            .try_acquire_at("c", t0 + Duration::from_secs(1))
            .is_ok());
    }

    #[test]
    fn test_prune_idle_drops_full_buckets_only() {
        let limiter = ClientRateLimiter::new(60);
        let t0 = Instant::now();
        limiter.try_acquire_at("idle", t0).unwrap();
        for _ in 0..30 {
            limiter.try_acquire_at("busy", t0 + Duration::from_secs(1)).unwrap();
        }

        let removed = limiter.prune_idle_at(t0 + Duration::from_secs(2));

        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
