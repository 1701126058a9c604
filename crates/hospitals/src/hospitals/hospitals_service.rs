use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use hospitals_upstream::{FetchOrchestrator, ResponseCache};
use log::{debug, error, info};

use super::hospitals_model::HospitalsResponse;
use super::hospitals_traits::HospitalServiceTrait;
use super::overpass::{build_query, clamp_limit, parse_hospitals, OverpassConfig};
use crate::errors::Result;
use crate::regions::lookup_wilaya;

/// Cache key for a `(wilaya, limit)` pair, e.g. `"16:200"`.
pub fn cache_key(wilaya_code: &str, limit: u32) -> String {
    format!("{}:{}", wilaya_code, limit)
}

/// Looks up hospitals through the cache, falling back to Overpass.
///
/// Concurrent misses on the same key are not coalesced: each caller runs its
/// own orchestration and the last successful write wins.
pub struct HospitalService {
    orchestrator: FetchOrchestrator,
    cache: Arc<ResponseCache<HospitalsResponse>>,
    config: OverpassConfig,
}

impl HospitalService {
    pub fn new(
        orchestrator: FetchOrchestrator,
        cache: Arc<ResponseCache<HospitalsResponse>>,
        config: OverpassConfig,
    ) -> Self {
        Self {
            orchestrator,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache<HospitalsResponse>> {
        &self.cache
    }
}

#[async_trait]
impl HospitalServiceTrait for HospitalService {
    async fn get_hospitals(&self, wilaya: &str, limit: u32) -> Result<HospitalsResponse> {
        let region = lookup_wilaya(wilaya)?;
        let limit = clamp_limit(limit);
        let key = cache_key(region.code, limit);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for '{}'", key);
            return Ok(cached);
        }

        let query = build_query(&region.bounding_box, limit);
        let payload = self
            .orchestrator
            .fetch(&query, &self.config.endpoints, &self.config.policy)
            .await
            .inspect_err(|e| error!("Overpass failed for wilaya {}: {}", region.code, e))?;

        let hospitals = parse_hospitals(&payload, limit).inspect_err(|e| {
            error!("Unusable Overpass payload for wilaya {}: {}", region.code, e)
        })?;

        let response = HospitalsResponse {
            wilaya: region.code.to_string(),
            bounding_box: region.bounding_box,
            count: hospitals.len(),
            hospitals,
            queried_at: Utc::now(),
        };

        info!(
            "Fetched {} hospitals for wilaya {} (limit {})",
            response.count, region.code, limit
        );
        self.cache.put(key, response.clone());
        Ok(response)
    }

    fn purge_expired_cache(&self) -> usize {
        self.cache.purge_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, ValidationError};
    use hospitals_upstream::{
        AttemptError, Endpoint, FetchError, RetryPolicy, UpstreamResponse, UpstreamTransport,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const BODY: &str = r#"{"elements": [
        {"type": "node", "id": 10, "lat": 36.7, "lon": 3.0, "tags": {"name": "CHU Mustapha"}},
        {"type": "way", "id": 11, "center": {"lat": 36.75, "lon": 3.05}, "tags": {}}
    ]}"#;

    struct MockTransport {
        status: u16,
        body: &'static str,
        call_count: AtomicUsize,
        last_query: Mutex<Option<String>>,
    }

    impl MockTransport {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                call_count: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UpstreamTransport for MockTransport {
        async fn send(
            &self,
            _endpoint: &Endpoint,
            query: &str,
            _timeout: Duration,
        ) -> std::result::Result<UpstreamResponse, AttemptError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.to_string());
            Ok(UpstreamResponse::new(self.status, self.body))
        }
    }

    fn service(transport: Arc<MockTransport>) -> HospitalService {
        let config = OverpassConfig {
            endpoints: vec![Endpoint::new("a"), Endpoint::new("b")],
            policy: RetryPolicy::new(2, Duration::from_millis(1), Duration::from_secs(1)),
        };
        HospitalService::new(
            FetchOrchestrator::new(transport),
            Arc::new(ResponseCache::default()),
            config,
        )
    }

    #[tokio::test]
    async fn test_fetches_and_normalizes() {
        let transport = MockTransport::new(200, BODY);
        let service = service(transport.clone());

        let response = service.get_hospitals("16", 200).await.unwrap();

        assert_eq!(response.wilaya, "16");
        assert_eq!(response.count, 2);
        assert_eq!(response.hospitals[0].name.as_deref(), Some("CHU Mustapha"));
        assert_eq!(response.bounding_box.south, 36.6222);
        assert_eq!(transport.calls(), 1);

        let query = transport.last_query.lock().unwrap().clone().unwrap();
        assert!(query.contains("(36.6222,2.7542,36.88,3.2561)"));
        assert!(query.contains("out center 200;"));
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let transport = MockTransport::new(200, BODY);
        let service = service(transport.clone());

        let first = service.get_hospitals("16", 200).await.unwrap();
        let second = service.get_hospitals("16", 200).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1);
        assert!(service.cache().get("16:200").is_some());
    }

    #[tokio::test]
    async fn test_cache_is_scoped_by_limit_and_padded_code() {
        let transport = MockTransport::new(200, BODY);
        let service = service(transport.clone());

        service.get_hospitals("9", 200).await.unwrap();
        service.get_hospitals("09", 200).await.unwrap();
        assert_eq!(transport.calls(), 1);

        service.get_hospitals("09", 50).await.unwrap();
        assert_eq!(transport.calls(), 2);
        assert!(service.cache().get("09:50").is_some());
    }

    #[tokio::test]
    async fn test_limit_is_clamped_before_keying() {
        let transport = MockTransport::new(200, BODY);
        let service = service(transport.clone());

        service.get_hospitals("16", 5000).await.unwrap();

        assert!(service.cache().get("16:1000").is_some());
        let query = transport.last_query.lock().unwrap().clone().unwrap();
        assert!(query.contains("out center 1000;"));
    }

    #[tokio::test]
    async fn test_unknown_wilaya_never_reaches_upstream() {
        let transport = MockTransport::new(200, BODY);
        let service = service(transport.clone());

        let result = service.get_hospitals("99", 200).await;

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::UnknownWilaya(_)))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_is_not_cached() {
        let transport = MockTransport::new(503, "busy");
        let service = service(transport.clone());

        let result = service.get_hospitals("16", 200).await;

        match result {
            Err(Error::Upstream(FetchError::AllEndpointsFailed(exhausted))) => {
                assert_eq!(exhausted.attempt_count(), 4);
            }
            other => panic!("expected upstream failure, got {:?}", other),
        }
        assert!(service.cache().is_empty());

        // No memo of the failure: the next call goes upstream again.
        let _ = service.get_hospitals("16", 200).await;
        assert_eq!(transport.calls(), 8);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_not_cached() {
        let transport = MockTransport::new(200, "<html>overloaded</html>");
        let service = service(transport.clone());

        let result = service.get_hospitals("16", 200).await;

        assert!(matches!(result, Err(Error::InvalidUpstreamPayload(_))));
        assert!(result.unwrap_err().is_upstream());
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_purge_expired_cache() {
        let transport = MockTransport::new(200, BODY);
        let service = HospitalService::new(
            FetchOrchestrator::new(transport),
            Arc::new(ResponseCache::new(Duration::ZERO)),
            OverpassConfig {
                endpoints: vec![Endpoint::new("a")],
                policy: RetryPolicy::default(),
            },
        );

        service.get_hospitals("16", 200).await.unwrap();
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(service.purge_expired_cache(), 1);
        assert!(service.cache().is_empty());
    }
}
