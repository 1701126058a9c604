use std::sync::Arc;

use crate::{config::Config, rate_limit::ClientRateLimiter};
use hospitals::{HospitalService, HospitalServiceTrait};
use hospitals_upstream::{FetchOrchestrator, HttpTransport, ResponseCache, UpstreamTransport};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub hospital_service: Arc<dyn HospitalServiceTrait>,
    pub rate_limiter: Arc<ClientRateLimiter>,
}

pub fn init_tracing() {
    let log_format = std::env::var("HOSPITALS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let transport = HttpTransport::new(&config.transport_config())?;
    Ok(build_state_with_transport(config, Arc::new(transport)))
}

/// Wire the services around an arbitrary upstream transport.
pub fn build_state_with_transport(
    config: &Config,
    transport: Arc<dyn UpstreamTransport>,
) -> Arc<AppState> {
    let overpass = config.overpass_config();
    tracing::info!(
        "Overpass endpoints: {} (max {} attempts each, base backoff {:?})",
        overpass
            .endpoints
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        overpass.policy.max_attempts_per_endpoint,
        overpass.policy.base_backoff,
    );

    let hospital_service = HospitalService::new(
        FetchOrchestrator::new(transport),
        Arc::new(ResponseCache::new(config.cache_ttl)),
        overpass,
    );

    Arc::new(AppState {
        hospital_service: Arc::new(hospital_service),
        rate_limiter: Arc::new(ClientRateLimiter::new(config.rate_limit_per_minute)),
    })
}
