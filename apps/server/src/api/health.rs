use std::sync::Arc;

use axum::{response::Html, routing::get, Router};

use crate::main_lib::AppState;

const USAGE_PAGE: &str =
    "<h3>Algeria Hospitals API</h3><p>Use <code>/api/hospitals?wilaya=16</code></p>";

async fn index() -> Html<&'static str> {
    Html(USAGE_PAGE)
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn readyz() -> &'static str {
    "ok"
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
