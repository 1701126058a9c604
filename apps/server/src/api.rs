use std::sync::Arc;

use axum::{http::HeaderValue, middleware, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    error::{panic_response, ApiError},
    main_lib::AppState,
    rate_limit::rate_limit,
};

pub mod health;
pub mod hospitals;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    // Only the data routes are rate limited; probes must always answer.
    let api = hospitals::router().route_layer(middleware::from_fn_with_state(
        state.rate_limiter.clone(),
        rate_limit,
    ));

    Router::new()
        .merge(health::router())
        .nest("/api", api)
        .fallback(|| async { ApiError::NotFound })
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
