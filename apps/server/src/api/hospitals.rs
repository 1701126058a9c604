use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use hospitals::{parse_limit, HospitalsResponse};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize, Debug, Default)]
pub struct HospitalsQuery {
    #[serde(default)]
    wilaya: Option<String>,
    /// Kept as text so that unusable values fall back to the default
    /// instead of rejecting the request.
    #[serde(default)]
    limit: Option<String>,
}

async fn get_hospitals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HospitalsQuery>,
) -> ApiResult<Json<HospitalsResponse>> {
    let wilaya = query.wilaya.unwrap_or_default();
    let limit = parse_limit(query.limit.as_deref());
    let response = state.hospital_service.get_hospitals(&wilaya, limit).await?;
    Ok(Json(response))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/hospitals", get(get_hospitals))
}
